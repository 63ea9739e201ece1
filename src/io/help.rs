//! Help collaborators passed to [`Router::with_help`](crate::Router::with_help)

use log::warn;
use std::io::{ErrorKind, Write};

/// Discard help text
pub fn no_help(_: &str) {}

/// Print help text to standard output
pub fn print_help(text: &str) {
    write_help(&mut std::io::stdout().lock(), text);
}

/// Write help text followed by a newline.
///
/// A closed stream is ignored; any other write failure is logged.
pub fn write_help<W: Write>(out: &mut W, text: &str) {
    match writeln!(out, "{}", text) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
        Err(e) => warn!("failed to write help text: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter(ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "write failed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_help_appends_newline() {
        let mut buf = Vec::new();
        write_help(&mut buf, "usage: greet <name>");
        assert_eq!(String::from_utf8(buf).unwrap(), "usage: greet <name>\n");
    }

    #[test]
    fn test_write_failures_do_not_panic() {
        write_help(&mut FailingWriter(ErrorKind::BrokenPipe), "usage");
        write_help(&mut FailingWriter(ErrorKind::PermissionDenied), "usage");
    }

    #[test]
    fn test_collaborators_accept_any_text() {
        no_help("ignored");
        print_help("");
    }
}
