//! Interactive menu and shell-friendly output

use std::io::{BufRead, Write};

use crate::{
    error::{IoContext, PickerError, Result},
    parser::InterfaceRecord,
};

pub const MENU_TITLE: &str = "List of Interfaces and IP Addresses:";
pub const PROMPT: &str = "Choose an interface: ";

/// Print the 1-indexed interface menu
pub fn render_menu<W: Write>(records: &[InterfaceRecord], out: &mut W) -> Result<()> {
    writeln!(out, "{}", MENU_TITLE).with_operation("write menu")?;
    for (idx, record) in records.iter().enumerate() {
        writeln!(out, "{} - {}", idx + 1, record).with_operation("write menu")?;
    }
    writeln!(out).with_operation("write menu")?;
    Ok(())
}

/// Show the prompt and read one selection from `input`.
///
/// Returns the zero-based index of the chosen record.
pub fn prompt_selection<R: BufRead, W: Write>(input: &mut R, out: &mut W, count: usize) -> Result<usize> {
    write!(out, "{}", PROMPT).with_operation("write prompt")?;
    out.flush().with_operation("write prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).with_operation("read selection")?;
    parse_selection(&line, count)
}

/// Turn the user's answer into a zero-based index into a list of `count` records.
///
/// Only the first whitespace-delimited token counts. Anything that is not a
/// number in `1..=count` is rejected.
pub fn parse_selection(answer: &str, count: usize) -> Result<usize> {
    let token = answer.split_whitespace().next().unwrap_or("");
    match token.parse::<usize>() {
        Ok(choice) if (1..=count).contains(&choice) => Ok(choice - 1),
        _ => Err(PickerError::invalid_selection(token, count)),
    }
}

/// Print the chosen record as `KEY=VALUE` lines
pub fn render_selection<W: Write>(record: &InterfaceRecord, out: &mut W) -> Result<()> {
    let block = format!("IFACE={}\nIPADDR={}\n", record.name(), record.address());
    out.write_all(block.as_bytes()).with_operation("write selection")?;
    out.flush().with_operation("write selection")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NO_ADDRESS;
    use std::io::Cursor;

    fn records() -> Vec<InterfaceRecord> {
        vec![
            InterfaceRecord::new("lo", Some("127.0.0.1".to_string())),
            InterfaceRecord::new("eth0", None),
        ]
    }

    #[test]
    fn test_render_menu() {
        let mut out = Vec::new();
        render_menu(&records(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "List of Interfaces and IP Addresses:\n\
             1 - Interface: lo, IP: 127.0.0.1\n\
             2 - Interface: eth0, IP: <no ip address>\n\
             \n"
        );
    }

    #[test]
    fn test_parse_selection_accepts_range() {
        assert_eq!(parse_selection("1\n", 2).unwrap(), 0);
        assert_eq!(parse_selection("  2  \n", 2).unwrap(), 1);
        assert_eq!(parse_selection("2 extra words", 2).unwrap(), 1);
    }

    #[test]
    fn test_parse_selection_rejects_out_of_range() {
        for answer in ["0", "3", "-1", "abc", "", "\n", "1.5", "99999999999999999999999"] {
            let error = parse_selection(answer, 2).unwrap_err();
            assert!(
                matches!(error, PickerError::InvalidSelection { count: 2, .. }),
                "answer {answer:?} gave {error:?}"
            );
        }
    }

    #[test]
    fn test_parse_selection_with_no_interfaces() {
        assert!(parse_selection("1", 0).is_err());
    }

    #[test]
    fn test_prompt_selection() {
        let mut input = Cursor::new("2\n");
        let mut out = Vec::new();
        let index = prompt_selection(&mut input, &mut out, 2).unwrap();
        assert_eq!(index, 1);
        assert_eq!(String::from_utf8(out).unwrap(), PROMPT);
    }

    #[test]
    fn test_prompt_selection_at_end_of_input() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert!(matches!(
            prompt_selection(&mut input, &mut out, 2),
            Err(PickerError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_render_selection() {
        let mut out = Vec::new();
        render_selection(&records()[0], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "IFACE=lo\nIPADDR=127.0.0.1\n");

        let mut out = Vec::new();
        render_selection(&records()[1], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("IFACE=eth0\nIPADDR={}\n", NO_ADDRESS)
        );
    }
}
