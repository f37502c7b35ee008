//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, colors::css};
use supports_color::Stream;
use vnm::CrawlError;

/// Detects whether colored output should be enabled on the given stream
pub fn supports_color(stream: Stream) -> bool {
    supports_color::on(stream).is_some()
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green), for text printed to stdout
    fn success(&self) -> String;
    /// Color as error (red), for text printed to stderr
    fn error(&self) -> String;
    /// Dim the text, for text printed to stderr
    fn dim(&self) -> String;
}

/// The stream each style of text is printed to.
#[derive(Debug, Clone, Copy)]
enum Style {
    Success,
    Error,
    Dim,
}

impl Style {
    const fn stream(self) -> Stream {
        match self {
            Self::Success => Stream::Stdout,
            Self::Error | Self::Dim => Stream::Stderr,
        }
    }

    fn enabled(self) -> bool {
        supports_color(self.stream())
    }
}

impl Colorize for str {
    fn success(&self) -> String {
        if Style::Success.enabled() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn error(&self) -> String {
        if Style::Error.enabled() {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if Style::Dim.enabled() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn error(&self) -> String {
        self.as_str().error()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// Print every rejected link of a failed crawl to stderr.
///
/// Other errors are left for the caller to report.
pub fn report_invalid_references(error: &CrawlError) {
    if let CrawlError::InvalidReferences(records) = error {
        eprintln!("{}", "Errors found parsing the links:".error());
        for record in records.iter() {
            eprintln!("  {}", record.to_string().dim());
        }
    }
}
