//! The buffer production pipeline end to end: synchronous validation,
//! readiness queuing, and buffer shape.

use overtone::{
    AudioContext, Blueprint, Config, Error, Event, Instrument, SharedCache,
};

const SAMPLES_PER_BUFFER: u32 = 2340;
const SAMPLE_RATE: u32 = 23400;

fn test_instrument() -> Instrument {
    let mut config = Config::new()
        .with("audio_context", AudioContext::new(SAMPLE_RATE))
        .with("shared_cache", SharedCache::new())
        .with("samples_per_buffer", SAMPLES_PER_BUFFER)
        .with("channel_count", 1u32);
    Instrument::new(Blueprint::base(), &mut config).unwrap()
}

fn request(buffer_count: u32, cycles_per_buffer: u32) -> Config {
    Config::new()
        .with("buffer_count", buffer_count)
        .with("cycles_per_buffer", cycles_per_buffer)
        .with("is_looping", false)
        .with("events", Vec::<Event>::new())
}

/// A cycle count that does not divide the buffer evenly is rejected
/// synchronously — no future is ever produced for bad input.
#[tokio::test(start_paused = true)]
async fn ratio_violation_raises_synchronously() {
    let mut config = Config::new()
        .with("audio_context", AudioContext::new(SAMPLE_RATE))
        .with("shared_cache", SharedCache::new())
        .with("samples_per_buffer", 5400u32);
    let instrument = Instrument::new(Blueprint::base(), &mut config).unwrap();

    let err = instrument.perform(&mut request(1, 124)).err().unwrap();
    assert_eq!(
        err,
        Error::Ratio {
            samples_per_buffer: 5400,
            cycles_per_buffer: 124,
        }
    );

    // Exact divisors pass.
    for cycles in [1u32, 2, 27, 5400] {
        instrument.perform(&mut request(1, cycles)).unwrap().await.unwrap();
    }
}

/// Exactly one action per event, enforced at the base tier.
#[tokio::test(start_paused = true)]
async fn events_require_exactly_one_action() {
    let instrument = test_instrument();

    let mut no_action = request(1, 1).with("events", vec![Event::at(100.0)]);
    let err = instrument.perform(&mut no_action).err().unwrap();
    assert_eq!(
        err,
        Error::EventShape {
            index: 0,
            detail: "does not specify an action",
        }
    );

    let mut two_actions =
        request(1, 1).with("events", vec![Event::at(100.0).down(1.0).gain(0.0)]);
    let err = instrument.perform(&mut two_actions).err().unwrap();
    assert_eq!(
        err,
        Error::EventShape {
            index: 0,
            detail: "has more than one action",
        }
    );

    let mut one_action = request(1, 1).with("events", vec![Event::at(100.0).down(1.0)]);
    instrument.perform(&mut one_action).unwrap().await.unwrap();
}

/// Events may be scheduled outside the performance window, and fields not in
/// any tier's vocabulary are ignored.
#[tokio::test(start_paused = true)]
async fn event_timing_and_unknown_actions() {
    let instrument = test_instrument();

    let events = vec![
        Event::at(-500.0).down(9.0),
        Event::at(f64::from(SAMPLES_PER_BUFFER) * 3.0).gain(0.0),
        Event::at(0.0).action("warp", 123.0), // unknown action, unchecked
    ];
    let mut config = request(2, 1).with("events", events);
    instrument.perform(&mut config).unwrap().await.unwrap();

    // A recognized action out of range still fails, positionally.
    let mut bad = request(1, 1).with("events", vec![Event::at(0.0).down(9.5)]);
    let err = instrument.perform(&mut bad).err().unwrap();
    assert!(matches!(err, Error::Range { ref field, .. } if field == "events[0].down"));
}

/// Buffer count and shape follow the request and the frozen config.
#[tokio::test(start_paused = true)]
async fn buffer_count_and_shape() {
    let instrument = test_instrument();
    let mut config = request(8, 234).with("is_looping", true);
    let buffers = instrument.perform(&mut config).unwrap().await.unwrap();

    assert_eq!(buffers.len(), 8);
    for buffer in &buffers {
        assert_eq!(buffer.data.len(), SAMPLES_PER_BUFFER);
        assert_eq!(buffer.data.channel_count(), 1);
        assert_eq!(buffer.data.sample_rate(), SAMPLE_RATE);
        assert_eq!(buffer.id.as_deref(), Some("silence"));
    }
}

/// Requests issued before readiness queue up and produce the same shapes as
/// requests issued after.
#[tokio::test(start_paused = true)]
async fn pre_and_post_readiness_equivalence() {
    let instrument = test_instrument();
    assert!(!instrument.is_ready());

    // Two queued requests, issued while still constructing; both fire.
    let early_a = instrument.perform(&mut request(2, 1)).unwrap();
    let early_b = instrument.perform(&mut request(3, 1)).unwrap();
    let buffers_a = early_a.await.unwrap();
    let buffers_b = early_b.await.unwrap();
    assert!(instrument.is_ready());

    let late = instrument.perform(&mut request(2, 1)).unwrap().await.unwrap();

    assert_eq!(buffers_a.len(), 2);
    assert_eq!(buffers_b.len(), 3);
    assert_eq!(late.len(), 2);
    assert_eq!(buffers_a[0], late[0]);
}

/// Perform-config defaults are applied and written back to the caller.
#[tokio::test(start_paused = true)]
async fn perform_defaults_written_back() {
    let instrument = test_instrument();
    let mut config = Config::new();
    instrument.perform(&mut config).unwrap().await.unwrap();

    assert_eq!(config.number("buffer_count"), Some(1.0));
    assert_eq!(config.number("cycles_per_buffer"), Some(1.0));
    assert_eq!(config.bool("is_looping"), Some(false));
    assert_eq!(config.events("events").map(<[_]>::len), Some(0));
}

/// Errors are terminal for the call, not the instrument: a failed request
/// leaves the instance fully usable.
#[tokio::test(start_paused = true)]
async fn instrument_survives_failed_requests() {
    let instrument = test_instrument();

    assert!(instrument.perform(&mut request(0, 1)).is_err()); // below minimum
    assert!(instrument
        .perform(&mut request(1, 1).with("is_looping", 1u32))
        .is_err()); // wrong type

    let buffers = instrument.perform(&mut request(1, 1)).unwrap().await.unwrap();
    assert_eq!(buffers.len(), 1);
}

/// Out-of-range perform fields report the violated bound.
#[tokio::test(start_paused = true)]
async fn perform_range_and_type_messages() {
    let instrument = test_instrument();

    let err = instrument.perform(&mut request(65536, 1)).err().unwrap();
    assert_eq!(
        err,
        Error::Range {
            schema: "base perform".into(),
            field: "buffer_count".into(),
            detail: "is greater than the maximum 65535".into(),
        }
    );

    let err = instrument
        .perform(&mut request(1, 1).with("events", 5u32))
        .err().unwrap();
    assert_eq!(
        err,
        Error::TypeMismatch {
            schema: "base perform".into(),
            field: "events".into(),
            detail: "is not an instance of EventList".into(),
        }
    );
}

/// Event lists load from YAML the way host configs supply them.
#[tokio::test(start_paused = true)]
async fn events_load_from_yaml() {
    let instrument = test_instrument();
    let events: Vec<Event> = serde_yaml::from_str(
        "- at: -50\n  down: 3\n- at: 100\n  gain: 4\n- at: 4680\n  down: 0\n",
    )
    .unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].at, -50.0);
    assert_eq!(events[1].get("gain"), Some(4.0));

    let mut config = request(1, 1).with("events", events);
    instrument.perform(&mut config).unwrap().await.unwrap();
}
