//! Interface table parser
//!
//! Turns the text printed by `ip a` into an ordered list of
//! [`InterfaceRecord`]s. The layout it understands is:
//!
//! ```text
//! 1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN
//!     link/loopback 00:00:00:00:00:00 brd 00:00:00:00:00:00
//!     inet 127.0.0.1/8 scope host lo
//! 2: eth0: <BROADCAST,MULTICAST> mtu 1500 qdisc noop state DOWN
//! ```
//!
//! Each header line opens an interface block. The first `inet ` line inside
//! the block closes it with that address; a new header or the end of input
//! closes it without one. Anything else is skipped.

use std::{fmt, io::BufRead};

/// Separates the interface name from its flags on a header line
pub const HEADER_MARKER: &str = ": <";

/// Precedes the IPv4 address on an address line
pub const ADDRESS_MARKER: &str = "inet ";

/// Shown in place of an address when an interface has none
pub const NO_ADDRESS: &str = "<no ip address>";

/// One interface and the first IPv4 address found for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    name: String,
    address: Option<String>,
}

impl InterfaceRecord {
    pub fn new<S: Into<String>>(name: S, address: Option<String>) -> Self {
        Self {
            name: name.into(),
            address: address.filter(|a| !a.is_empty()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The address, or [`NO_ADDRESS`] when none was found
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(NO_ADDRESS)
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }
}

impl fmt::Display for InterfaceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface: {}, IP: {}", self.name, self.address())
    }
}

/// Scan state carried from one line to the next
#[derive(Debug, Default)]
enum ScanState {
    /// Looking for the next header
    #[default]
    Idle,
    /// Inside a block whose address has not been seen yet
    Pending(String),
}

impl ScanState {
    /// Feed one line. Returns the record the line completed, if any.
    fn advance(&mut self, line: &str) -> Option<InterfaceRecord> {
        if line.contains(HEADER_MARKER) {
            // A nameless header still closes the open block
            let next = match header_name(line) {
                Some(name) => Self::Pending(name.to_string()),
                None => {
                    tracing::trace!(line, "header without interface name skipped");
                    Self::Idle
                }
            };
            return match std::mem::replace(self, next) {
                Self::Pending(open) => {
                    tracing::trace!(interface = %open, "no address before next header");
                    Some(InterfaceRecord::new(open, None))
                }
                Self::Idle => None,
            };
        }

        if let Self::Pending(name) = self {
            if let Some(address) = inet_address(line) {
                tracing::trace!(interface = %name, address, "address found");
                let record = InterfaceRecord::new(std::mem::take(name), Some(address.to_string()));
                *self = Self::Idle;
                return Some(record);
            }
        }

        None
    }

    /// Close out the scan at end of input
    fn finish(&mut self) -> Option<InterfaceRecord> {
        match std::mem::take(self) {
            Self::Pending(name) => Some(InterfaceRecord::new(name, None)),
            Self::Idle => None,
        }
    }
}

/// Extract the interface name from a header line.
///
/// The name sits between the leading `<index>: ` token and the flags marker,
/// e.g. `12: veth0@if11: <BROADCAST>` gives `veth0@if11`. A header without an
/// index token gives everything before the marker. Returns `None` for lines
/// that are not headers or whose name would be empty.
pub fn header_name(line: &str) -> Option<&str> {
    let marker = line.find(HEADER_MARKER)?;
    let head = &line[..marker];
    let name = match head.find(": ") {
        Some(sep) => &head[sep + 2..],
        None => head,
    }
    .trim();

    (!name.is_empty()).then_some(name)
}

/// Extract the IPv4 address from an address line.
///
/// Takes the text between `inet ` and the next `/`. Without a `/` the first
/// whitespace-delimited token is used.
pub fn inet_address(line: &str) -> Option<&str> {
    let start = line.find(ADDRESS_MARKER)? + ADDRESS_MARKER.len();
    let rest = &line[start..];
    let address = match rest.find('/') {
        Some(end) => rest[..end].trim(),
        None => rest.split_whitespace().next().unwrap_or(""),
    };
    Some(address)
}

/// Lazy iterator adaptor yielding one record per header line
pub struct Records<I> {
    lines: I,
    state: ScanState,
    done: bool,
}

impl<I> Records<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            state: ScanState::default(),
            done: false,
        }
    }
}

impl<I, S> Iterator for Records<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = InterfaceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for line in self.lines.by_ref() {
            if let Some(record) = self.state.advance(line.as_ref()) {
                return Some(record);
            }
        }
        self.done = true;
        self.state.finish()
    }
}

/// Parse a complete listing given as lines
pub fn parse_lines<I, S>(lines: I) -> Vec<InterfaceRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Records::new(lines.into_iter()).collect()
}

/// Parse a listing read from `reader`, one line at a time.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. Read
/// errors are returned as-is; no partial list is produced.
pub fn parse_reader<R: BufRead>(mut reader: R) -> std::io::Result<Vec<InterfaceRecord>> {
    let mut state = ScanState::default();
    let mut records = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buffer);
        if let Some(record) = state.advance(&line) {
            records.push(record);
        }
    }
    records.extend(state.finish());

    tracing::debug!(interfaces = records.len(), "listing parsed");
    Ok(records)
}
