//! Application orchestration
//!
//! One run is: read the listing, parse it, show the menu, read the choice,
//! print the chosen record. Terminal I/O is passed in so the whole flow can
//! run against in-memory buffers.

use std::io::{BufRead, Write};

use crate::{
    cli::Cli,
    config::AppConfig,
    error::Result,
    menu,
    parser::InterfaceRecord,
    source::{self, InterfaceSource},
};

/// Main application orchestrator
pub struct Application {
    source: Box<dyn InterfaceSource>,
}

impl Application {
    /// Create an application reading from the source selected by `cli` and `config`
    pub fn new(config: &AppConfig, cli: &Cli) -> Self {
        Self::with_source(source::create_source(config, cli))
    }

    pub fn with_source(source: Box<dyn InterfaceSource>) -> Self {
        Self { source }
    }

    /// Run one selection round and return the chosen record.
    ///
    /// The `IFACE=`/`IPADDR=` block is written only once the selection is
    /// valid; on any error nothing after the prompt reaches `out`.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<InterfaceRecord> {
        tracing::info!(source = %self.source.describe(), "Listing interfaces");

        let mut records = self.source.interfaces()?;
        if records.is_empty() {
            tracing::warn!(source = %self.source.describe(), "No interfaces found in listing");
        }

        menu::render_menu(&records, out)?;
        let index = menu::prompt_selection(input, out, records.len())?;
        let selected = records.swap_remove(index);

        tracing::info!(interface = %selected.name(), address = %selected.address(), "Interface selected");
        menu::render_selection(&selected, out)?;

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::PickerError,
        parser::{self, NO_ADDRESS},
    };
    use std::io::Cursor;

    const SCENARIO_ONE: &str = "\
1: lo: <LOOPBACK,UP,LOWER_UP>
    inet 127.0.0.1/8 scope host lo
2: eth0: <BROADCAST,MULTICAST>
";

    struct TextSource(&'static str);

    impl InterfaceSource for TextSource {
        fn interfaces(&self) -> Result<Vec<InterfaceRecord>> {
            Ok(parser::parse_lines(self.0.lines()))
        }

        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    struct UnavailableSource;

    impl InterfaceSource for UnavailableSource {
        fn interfaces(&self) -> Result<Vec<InterfaceRecord>> {
            Err(PickerError::command_unavailable("ip a", "No such file or directory"))
        }

        fn describe(&self) -> String {
            "ip a".to_string()
        }
    }

    fn run_with(source: Box<dyn InterfaceSource>, answer: &str) -> (Result<InterfaceRecord>, String) {
        let app = Application::with_source(source);
        let mut input = Cursor::new(answer.to_string());
        let mut out = Vec::new();
        let result = app.run(&mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_select_first_interface() {
        let (result, output) = run_with(Box::new(TextSource(SCENARIO_ONE)), "1\n");

        let selected = result.unwrap();
        assert_eq!(selected.name(), "lo");
        assert_eq!(selected.address(), "127.0.0.1");
        assert!(output.contains("1 - Interface: lo, IP: 127.0.0.1\n"));
        assert!(output.contains("2 - Interface: eth0, IP: <no ip address>\n"));
        assert!(output.ends_with("Choose an interface: IFACE=lo\nIPADDR=127.0.0.1\n"));
    }

    #[test]
    fn test_select_interface_without_address() {
        let (result, output) = run_with(Box::new(TextSource(SCENARIO_ONE)), "2\n");

        assert_eq!(result.unwrap().address(), NO_ADDRESS);
        assert!(output.ends_with("IFACE=eth0\nIPADDR=<no ip address>\n"));
    }

    #[test]
    fn test_out_of_range_selection() {
        let (result, output) = run_with(Box::new(TextSource(SCENARIO_ONE)), "3\n");

        let error = result.unwrap_err();
        assert!(matches!(error, PickerError::InvalidSelection { count: 2, .. }));
        assert_eq!(error.exit_code(), 1);
        assert!(!output.contains("IFACE="));
        assert!(output.ends_with("Choose an interface: "));
    }

    #[test]
    fn test_empty_listing_rejects_every_selection() {
        let (result, output) = run_with(Box::new(TextSource("")), "1\n");

        assert!(matches!(result, Err(PickerError::InvalidSelection { count: 0, .. })));
        assert!(output.starts_with("List of Interfaces and IP Addresses:\n"));
    }

    #[test]
    fn test_unavailable_command_prints_nothing() {
        let (result, output) = run_with(Box::new(UnavailableSource), "1\n");

        assert!(matches!(result, Err(PickerError::CommandUnavailable { .. })));
        assert!(output.is_empty());
    }
}
