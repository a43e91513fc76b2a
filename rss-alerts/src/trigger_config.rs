use crate::trigger::{Direction, Trigger};
use crate::types::{AlertError, Result};
use chrono::{FixedOffset, Offset, Utc};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Parser for line-based trigger files:
///
/// ```text
/// # comment
/// t1,TITLE,election
/// t2,DESCRIPTION,Trump
/// t3,AFTER,3 Oct 2016 17:00:10
/// t4,AND,t2,t3
/// ADD,t1,t4
/// ```
///
/// Names must be defined before use. `ADD` appends named triggers to the
/// resulting trigger list in order.
pub struct TriggerConfig {
    reference_offset: FixedOffset,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl TriggerConfig {
    /// `reference_offset` anchors BEFORE/AFTER times written without a zone.
    pub fn new(reference_offset: FixedOffset) -> Self {
        Self { reference_offset }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<Trigger>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let triggers = self.parse(&content)?;
        info!("Loaded {} triggers from {}", triggers.len(), path.display());
        Ok(triggers)
    }

    pub fn parse(&self, content: &str) -> Result<Vec<Trigger>> {
        let mut named: HashMap<String, Trigger> = HashMap::new();
        let mut trigger_list = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
            let err = |message: String| AlertError::Configuration { line, message };

            if fields[0].eq_ignore_ascii_case("ADD") {
                if fields.len() < 2 {
                    return Err(err("ADD needs at least one trigger name".to_string()));
                }
                for name in &fields[1..] {
                    let trigger = named
                        .get(*name)
                        .ok_or_else(|| err(format!("ADD of undefined trigger {:?}", name)))?;
                    trigger_list.push(trigger.clone());
                }
                continue;
            }

            if fields.len() < 3 {
                return Err(err(format!("expected `name,KIND,args`, got {:?}", raw)));
            }
            let name = fields[0];
            if name.is_empty() {
                return Err(err("trigger name is empty".to_string()));
            }
            if named.contains_key(name) {
                return Err(err(format!("trigger {:?} is already defined", name)));
            }

            let kind = fields[1].to_ascii_uppercase();
            let args = &fields[2..];
            let lookup = |child: &str| {
                named
                    .get(child)
                    .cloned()
                    .ok_or_else(|| err(format!("trigger {:?} is used before it is defined", child)))
            };
            let expect_args = |count: usize| {
                if args.len() == count {
                    Ok(())
                } else {
                    Err(err(format!("{} takes {} argument(s), got {}", kind, count, args.len())))
                }
            };

            let trigger = match kind.as_str() {
                // Phrases may themselves contain commas; rejoin them.
                "TITLE" => Trigger::title(&args.join(",")),
                "DESCRIPTION" => Trigger::description(&args.join(",")),
                "BEFORE" => {
                    expect_args(1)?;
                    Trigger::time_text(args[0], Direction::Before, self.reference_offset)
                }
                "AFTER" => {
                    expect_args(1)?;
                    Trigger::time_text(args[0], Direction::After, self.reference_offset)
                }
                "NOT" => {
                    expect_args(1)?;
                    Ok(Trigger::not(lookup(args[0])?))
                }
                "AND" => {
                    expect_args(2)?;
                    Ok(Trigger::and(lookup(args[0])?, lookup(args[1])?))
                }
                "OR" => {
                    expect_args(2)?;
                    Ok(Trigger::or(lookup(args[0])?, lookup(args[1])?))
                }
                other => return Err(err(format!("unknown trigger kind {:?}", other))),
            }
            .map_err(|e| match e {
                AlertError::Configuration { message, .. } => err(message),
                other => other,
            })?;

            debug!("Defined trigger {} = {:?}", name, trigger);
            named.insert(name.to_string(), trigger);
        }

        Ok(trigger_list)
    }
}

/// The trigger list used when no trigger file is given.
pub fn default_triggers() -> Result<Vec<Trigger>> {
    Ok(vec![Trigger::title("Trump")?, Trigger::description("Trump")?])
}
