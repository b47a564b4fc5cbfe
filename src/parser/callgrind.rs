//! Grammar parser for callgrind-format profiles.
//!
//! The format is a sequence of parts, each a block of `key: value` header
//! lines followed by body lines. Body lines either set the current
//! position (`fn=`, `cfn=`, ...), announce a call (`calls=N ...`), or carry
//! costs (`<positions> <events>`). Productions are tried in order; one that
//! does not match leaves the cursor untouched so the next can be tried.

use super::cost::{parse_event_value, CostUnit};
use super::line_cursor::LineCursor;
use super::position::{
    decode_subposition, is_decimal, is_subposition, PositionTable, Slot, Specifier,
};
use crate::callgraph::{FunctionIdentity, Profile};
use crate::utils::config::{DEFAULT_POSITIONS, PART_DETAIL_KEYS, SUMMARY_KEYS};
use crate::utils::error::ParseError;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

static KEY_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+):").unwrap());

static POSITION_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<position>[cj]?(?:ob|fl|fi|fe|fn))=\s*(?:\((?P<id>\d+)\))?(?:\s*(?P<name>.+))?")
        .unwrap()
});

/// Parser configuration
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    pub identity: FunctionIdentity,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: FunctionIdentity) -> Self {
        self.identity = identity;
        self
    }
}

/// Single-use parser over one callgrind stream
pub struct CallgrindParser<R> {
    cursor: LineCursor<R>,
    profile: Profile,
    config: ParserConfig,

    positions: PositionTable,

    cost_positions: Vec<String>,
    last_positions: Vec<i64>,

    cost_events: Vec<String>,
    unit: CostUnit,

    parts: usize,
}

impl<R: BufRead> CallgrindParser<R> {
    pub fn new(reader: R, config: ParserConfig) -> Self {
        let cost_positions: Vec<String> = DEFAULT_POSITIONS.iter().map(|p| p.to_string()).collect();
        let last_positions = vec![0; cost_positions.len()];

        Self {
            cursor: LineCursor::new(reader),
            profile: Profile::new(),
            config,
            positions: PositionTable::new(),
            cost_positions,
            last_positions,
            cost_events: Vec::new(),
            unit: CostUnit::default(),
            parts: 0,
        }
    }

    /// Parse the whole stream into a profile
    ///
    /// # Errors
    /// * `ParseError::MalformedSchema` - a cost line has more fields than declared
    /// * `ParseError::TrailingInput` - a line matched no production
    /// * `ParseError::Io` - the stream could not be read
    pub fn parse(mut self) -> Result<Profile, ParseError> {
        self.parse_key(&["version"]);

        if let Some((_, creator)) = self.parse_key(&["creator"]) {
            self.profile.creator = Some(creator);
        }

        while self.parse_part()? {}

        if let Some(e) = self.cursor.take_error() {
            return Err(ParseError::Io(e));
        }

        if !self.cursor.at_end() {
            return Err(ParseError::TrailingInput {
                line: self.cursor.current_line().to_string(),
            });
        }

        info!(
            "Parsed {} part(s), {} function(s)",
            self.parts,
            self.profile.len()
        );

        Ok(self.profile)
    }

    fn parse_part(&mut self) -> Result<bool, ParseError> {
        if !self.parse_header_line() {
            return Ok(false);
        }
        while self.parse_header_line() {}

        if !self.parse_body_line()? {
            return Ok(false);
        }
        while self.parse_body_line()? {}

        self.parts += 1;
        debug!(
            "Finished part {} at line {}",
            self.parts,
            self.cursor.line_number()
        );
        Ok(true)
    }

    fn parse_header_line(&mut self) -> bool {
        self.parse_empty()
            || self.parse_comment()
            || self.parse_part_detail()
            || self.parse_description()
            || self.parse_event_specification()
            || self.parse_cost_line_definition()
            || self.parse_cost_summary()
    }

    fn parse_body_line(&mut self) -> Result<bool, ParseError> {
        if self.parse_empty() || self.parse_comment() {
            return Ok(true);
        }
        if self.parse_cost_line(0)? {
            return Ok(true);
        }
        if self.parse_position_spec() {
            return Ok(true);
        }
        self.parse_association_spec()
    }

    fn parse_empty(&mut self) -> bool {
        if self.cursor.at_end() || !self.cursor.current_line().is_empty() {
            return false;
        }

        self.cursor.consume();
        true
    }

    fn parse_comment(&mut self) -> bool {
        if !self.cursor.current_line().starts_with('#') {
            return false;
        }

        self.cursor.consume();
        true
    }

    /// `cmd:`, `pid:`, `thread:` and `part:`; the command is kept on the profile
    fn parse_part_detail(&mut self) -> bool {
        match self.parse_key(PART_DETAIL_KEYS) {
            Some((key, value)) => {
                if key == "cmd" {
                    self.profile.command = Some(value);
                }
                true
            }
            None => false,
        }
    }

    fn parse_description(&mut self) -> bool {
        self.parse_key(&["desc"]).is_some()
    }

    fn parse_event_specification(&mut self) -> bool {
        self.parse_key(&["event"]).is_some()
    }

    fn parse_cost_line_definition(&mut self) -> bool {
        let Some((key, value)) = self.parse_key(&["events", "positions"]) else {
            return false;
        };

        let items: Vec<String> = value.split_whitespace().map(str::to_string).collect();
        if key == "events" {
            self.unit = CostUnit::from_events(&items);
            debug!(
                "Events declared: {:?} ({} ns per unit)",
                items,
                self.unit.nanos_per_unit()
            );
            self.cost_events = items;
        } else {
            debug!("Positions declared: {:?}", items);
            self.last_positions = vec![0; items.len()];
            self.cost_positions = items;
        }

        true
    }

    fn parse_cost_summary(&mut self) -> bool {
        let Some((_, value)) = self.parse_key(SUMMARY_KEYS) else {
            return false;
        };

        if let Some(total) = value
            .split_whitespace()
            .next()
            .and_then(|field| field.parse::<f64>().ok())
        {
            self.profile.total_cost = self.unit.scale(total);
            debug!("Total cost: {:?}", self.profile.total_cost);
        }

        true
    }

    /// A cost line: position columns, then event values
    ///
    /// With `calls == 0` the cost is the active function's own; otherwise
    /// it is attributed to the call from the active function to the
    /// current `cfn`.
    fn parse_cost_line(&mut self, calls: u64) -> Result<bool, ParseError> {
        let line = self.cursor.current_line().to_string();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if !self.is_cost_line(&tokens) {
            return Ok(false);
        }

        let position_count = self.cost_positions.len();
        if tokens.len() > position_count + self.cost_events.len() {
            return Err(ParseError::MalformedSchema { line });
        }

        let function = self.current_function();

        if calls == 0 && self.positions.contains(Slot::Ob) {
            let object = self.positions.get(Slot::Ob).to_string();
            self.positions.set(Slot::Cob, object);
        }

        for (column, token) in tokens.iter().take(position_count).enumerate() {
            self.last_positions[column] = decode_subposition(token, self.last_positions[column]);
        }
        let line_number = self.last_positions.first().copied().unwrap_or(0);

        // missing trailing event values count as zero
        let value = tokens
            .get(position_count)
            .map(|token| parse_event_value(token))
            .unwrap_or(0.0);
        let cost = self.unit.scale(value);

        self.profile.slot_mut(function).line_number = line_number;

        if calls == 0 {
            let active = self.profile.slot_mut(function);
            active.cost = active.cost.saturating_add(cost);
        } else {
            let callee = self.current_callee();
            let callee_id = {
                let target = self.profile.slot_mut(callee);
                target.called = target.called.saturating_add(calls);
                target.line_number = line_number;
                target.id.clone()
            };
            self.profile
                .slot_mut(function)
                .record_call(&callee_id, calls, cost);

            // cob= and cfi= only describe the call they precede
            self.positions.clear(Slot::Cob);
            self.positions.clear(Slot::Cfl);
        }

        self.cursor.consume();
        Ok(true)
    }

    fn is_cost_line(&self, tokens: &[&str]) -> bool {
        let position_count = self.cost_positions.len();

        !tokens.is_empty()
            && is_subposition(tokens[0])
            && tokens.iter().enumerate().skip(1).all(|(column, token)| {
                if column < position_count {
                    is_subposition(token)
                } else {
                    is_decimal(token)
                }
            })
    }

    fn parse_position_spec(&mut self) -> bool {
        let line = self.cursor.current_line();

        if line.starts_with("jump=") || line.starts_with("jcnd=") {
            self.cursor.consume();
            return true;
        }

        let Some((position, id, name)) = split_position_spec(line) else {
            return false;
        };

        match Specifier::from_name(&position) {
            Some(spec) => {
                self.positions.assign(spec, id.as_deref(), name.as_deref());
            }
            None => debug!(
                "Ignoring unsupported specifier '{}' at line {}",
                position,
                self.cursor.line_number()
            ),
        }

        self.cursor.consume();
        true
    }

    /// `calls=N <target position>` followed by the cost line of the call
    fn parse_association_spec(&mut self) -> Result<bool, ParseError> {
        let Some(rest) = self.cursor.current_line().strip_prefix("calls=") else {
            return Ok(false);
        };

        let calls = rest
            .split_whitespace()
            .next()
            .and_then(|count| count.parse::<u64>().ok())
            .unwrap_or(0);

        self.cursor.consume();
        self.parse_cost_line(calls)?;

        Ok(true)
    }

    /// Match a `key: value` line whose key is one of `keys`, consuming it
    fn parse_key(&mut self, keys: &[&str]) -> Option<(String, String)> {
        let line = self.cursor.current_line();

        let key = KEY_RX.captures(line)?.get(1)?.as_str();
        if !keys.contains(&key) {
            return None;
        }

        let key = key.to_string();
        let value = line[key.len() + 1..].trim().to_string();

        self.cursor.consume();
        Some((key, value))
    }

    fn current_function(&mut self) -> usize {
        let module = self.positions.get(Slot::Ob);
        let file = self.positions.get(Slot::Fl);
        let name = self.positions.get(Slot::Fn);
        let id = self.config.identity.key(module, file, name);

        self.profile.function_or_insert(&id, name, module)
    }

    /// The callee lives in the caller's object and file unless `cob=`/`cfi=` said otherwise
    fn current_callee(&mut self) -> usize {
        let module = self.positions.get_or(Slot::Cob, Slot::Ob);
        let file = self.positions.get_or(Slot::Cfl, Slot::Fl);
        let name = self.positions.get(Slot::Cfn);
        let id = self.config.identity.key(module, file, name);

        self.profile.function_or_insert(&id, name, module)
    }
}

/// Split `spec=(id) name` into its specifier, id and name
fn split_position_spec(line: &str) -> Option<(String, Option<String>, Option<String>)> {
    let groups = POSITION_RX.captures(line)?;

    let position = groups.name("position")?.as_str().to_string();
    let id = groups.name("id").map(|m| m.as_str().to_string());
    let name = groups.name("name").map(|m| m.as_str().to_string());

    Some((position, id, name))
}

/// Parse a profile from any buffered reader
pub fn parse_profile<R: BufRead>(reader: R, config: &ParserConfig) -> Result<Profile, ParseError> {
    CallgrindParser::new(reader, config.clone()).parse()
}

/// Parse a profile held in memory, name-only identity
pub fn parse_str(input: &str) -> Result<Profile, ParseError> {
    parse_profile(input.as_bytes(), &ParserConfig::default())
}

/// Open and parse a profile file
pub fn parse_file(path: impl AsRef<Path>, config: &ParserConfig) -> Result<Profile, ParseError> {
    let path = path.as_ref();
    debug!("Reading profile from: {}", path.display());

    let file = File::open(path)?;
    parse_profile(BufReader::new(file), config)
}
