//! The tiered schema registry.
//!
//! A [`SchemaSet`] holds nine descriptor lists — three groups (constructor,
//! perform, events) by three tiers (base, family, specific) — and runs the
//! tier passes in the fixed order base → family → specific. Identifier
//! collisions across the full set are a fatal configuration error, detected
//! once before any field validation.

use std::collections::HashSet;

use crate::error::Error;
use crate::event::Event;
use crate::schema::validator::{self, DefaultOutcome};
use crate::schema::{base, Descriptor, Group, Tier};
use crate::value::{Config, Value};

/// Per-kind resolution of the nine schema lists.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    // Indexed [group][tier].
    lists: [[Vec<Descriptor>; 3]; 3],
}

impl SchemaSet {
    /// Base-tier schemas only; family and specific lists start empty.
    pub fn base() -> Self {
        Self {
            lists: [
                [base::constructor(), Vec::new(), Vec::new()],
                [base::perform(), Vec::new(), Vec::new()],
                [base::events(), Vec::new(), Vec::new()],
            ],
        }
    }

    /// Read-only view of one of the nine lists.
    pub fn descriptors(&self, group: Group, tier: Tier) -> &[Descriptor] {
        &self.lists[group.index()][tier.index()]
    }

    /// Replace a family or specific list. The base tier is fixed by this
    /// crate and cannot be overridden, mirroring how deeper layers may only
    /// add their own vocabulary.
    pub(crate) fn set_list(&mut self, group: Group, tier: Tier, descriptors: Vec<Descriptor>) {
        debug_assert!(tier != Tier::Base, "base tier is fixed");
        self.lists[group.index()][tier.index()] = descriptors;
    }

    /// Scan all nine lists for a repeated `name` or `alias`.
    pub fn check_duplicates(&self) -> Result<(), Error> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut aliases: HashSet<&str> = HashSet::new();
        for group in Group::ALL {
            for tier in Tier::ALL {
                for (index, desc) in self.descriptors(group, tier).iter().enumerate() {
                    if !names.insert(desc.name()) {
                        return Err(Error::DuplicateIdentifier {
                            kind: "name",
                            ident: desc.name().to_string(),
                            group,
                            tier,
                            index,
                        });
                    }
                    if !aliases.insert(desc.alias()) {
                        return Err(Error::DuplicateIdentifier {
                            kind: "alias",
                            ident: desc.alias().to_string(),
                            group,
                            tier,
                            index,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// One tier's pass over a field group: per descriptor, in declaration
    /// order, apply-default then type then range. First failure wins.
    fn validate_tier(&self, group: Group, tier: Tier, config: &mut Config) -> Result<(), Error> {
        let schema = format!("{tier} {group}");
        for desc in self.descriptors(group, tier) {
            let outcome = validator::apply_default(desc, config);
            let Some(value) = config.get(desc.name()) else {
                debug_assert_eq!(outcome, DefaultOutcome::MissingMandatory);
                return Err(Error::MissingField {
                    schema,
                    field: desc.name().to_string(),
                });
            };
            if let Some(detail) = validator::validate_type(desc, value) {
                return Err(Error::TypeMismatch {
                    schema,
                    field: desc.name().to_string(),
                    detail,
                });
            }
            if let Some(detail) = validator::validate_range(desc, value) {
                return Err(Error::Range {
                    schema,
                    field: desc.name().to_string(),
                    detail,
                });
            }
        }
        Ok(())
    }

    /// Tiered constructor-config validation: base → family → specific.
    pub fn validate_constructor(&self, config: &mut Config) -> Result<(), Error> {
        for tier in Tier::ALL {
            self.validate_tier(Group::Constructor, tier, config)?;
        }
        Ok(())
    }

    /// Tiered perform-config validation. The whole-number-cycle invariant
    /// belongs to the base tier, so it runs before the family and specific
    /// passes.
    pub fn validate_perform(
        &self,
        config: &mut Config,
        samples_per_buffer: u32,
    ) -> Result<(), Error> {
        self.validate_tier(Group::Perform, Tier::Base, config)?;

        // Only waveforms whose cycle length divides the buffer evenly.
        let cycles_per_buffer = config.number("cycles_per_buffer").unwrap_or(1.0) as u32;
        if samples_per_buffer % cycles_per_buffer != 0 {
            return Err(Error::Ratio {
                samples_per_buffer,
                cycles_per_buffer,
            });
        }

        self.validate_tier(Group::Perform, Tier::Family, config)?;
        self.validate_tier(Group::Perform, Tier::Specific, config)?;
        Ok(())
    }

    /// Tiered event validation. Only fields actually present on an event are
    /// checked — events omit fields freely, and no defaults are applied.
    /// The exactly-one-action rule is enforced by the base tier alone;
    /// family and specific tiers validate their own vocabularies without it.
    pub fn validate_events(&self, events: &[Event]) -> Result<(), Error> {
        for tier in Tier::ALL {
            let schema = format!("{tier} {}", Group::Events);
            let list = self.descriptors(Group::Events, tier);
            for (index, event) in events.iter().enumerate() {
                if tier == Tier::Base {
                    match event.action_count() {
                        0 => {
                            return Err(Error::EventShape {
                                index,
                                detail: "does not specify an action",
                            })
                        }
                        1 => {}
                        _ => {
                            return Err(Error::EventShape {
                                index,
                                detail: "has more than one action",
                            })
                        }
                    }
                }
                for desc in list {
                    let present = if desc.name() == "at" {
                        Some(event.at)
                    } else {
                        event.get(desc.name())
                    };
                    let Some(number) = present else { continue };
                    let value = Value::Number(number);
                    let field = format!("events[{index}].{}", desc.name());
                    if let Some(detail) = validator::validate_type(desc, &value) {
                        return Err(Error::TypeMismatch {
                            schema,
                            field,
                            detail,
                        });
                    }
                    if let Some(detail) = validator::validate_range(desc, &value) {
                        return Err(Error::Range {
                            schema,
                            field,
                            detail,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy out every descriptor-named value present in `config`, across all
    /// tiers of one group. Freezing support: unknown keys are never carried.
    pub fn collect(&self, group: Group, config: &Config) -> Config {
        let mut out = Config::new();
        for tier in Tier::ALL {
            for desc in self.descriptors(group, tier) {
                if let Some(value) = config.get(desc.name()) {
                    out.set(desc.name(), value.clone());
                }
            }
        }
        out
    }
}
