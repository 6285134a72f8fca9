//! Terminal output for the `gpu-portal` CLI.
//!
//! Every status line is a mark followed by text. With colour the mark is a
//! glyph; without it the mark is a bracketed tag so logs stay greppable.

use owo_colors::{OwoColorize, Style};

const COLUMN_WIDTH: usize = 15;

const LOGO: [&str; 4] = [
    "  ___ ___ _   _   ___         _        _ ",
    " / __| _ \\ | | | | _ \\___ _ _| |_ __ _| |",
    "| (_ |  _/ |_| | |  _/ _ \\ '_|  _/ _` | |",
    " \\___|_|  \\___/  |_| \\___/_|  \\__\\__,_|_|",
];

const TAGLINE: &str = "Research GPU Resource Portal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Ok,
    Info,
    Warn,
    Fail,
    Created,
    Skipped,
}

impl Mark {
    fn glyph(self) -> &'static str {
        match self {
            Mark::Ok | Mark::Created => "✓",
            Mark::Info => "•",
            Mark::Warn => "⚠",
            Mark::Fail => "✗",
            Mark::Skipped => "○",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Mark::Ok => "[OK]",
            Mark::Info => "[INFO]",
            Mark::Warn => "[WARN]",
            Mark::Fail => "[ERROR]",
            Mark::Created => "[CREATED]",
            Mark::Skipped => "[SKIPPED]",
        }
    }

    fn style(self) -> Style {
        match self {
            Mark::Ok | Mark::Created => Style::new().green().bold(),
            Mark::Info => Style::new().blue(),
            Mark::Warn | Mark::Skipped => Style::new().yellow(),
            Mark::Fail => Style::new().red().bold(),
        }
    }
}

/// Printer shared by the subcommands.
pub struct Output {
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Plain output for `--no-color` and non-terminal use.
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn render(&self, mark: Mark, text: &str) -> String {
        if self.colored {
            let text = match mark {
                Mark::Ok => text.green().to_string(),
                Mark::Warn => text.yellow().to_string(),
                Mark::Fail => text.red().to_string(),
                _ => text.to_string(),
            };
            format!("  {} {}", mark.glyph().style(mark.style()), text)
        } else {
            format!("  {} {}", mark.tag(), text)
        }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        println!();
        for (i, line) in LOGO.iter().enumerate() {
            if !self.colored {
                println!("   {}", line);
            } else if i + 1 == LOGO.len() {
                println!("   {}", line.cyan().bold());
            } else {
                println!("   {}", line.green().bold());
            }
        }
        if self.colored {
            println!("\n   {} {}\n", TAGLINE.bright_white().bold(), version.dimmed());
        } else {
            println!("\n   {} {}\n", TAGLINE, version);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.render(Mark::Ok, message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.render(Mark::Info, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.render(Mark::Warn, message));
    }

    /// Goes to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.render(Mark::Fail, message));
    }

    /// `kind` is what was written ("config", "env"), `path` where.
    pub fn created(&self, kind: &str, path: &str) {
        let text = if self.colored {
            format!("{} {}", kind.dimmed(), path.bright_white())
        } else {
            format!("{} {}", kind, path)
        };
        println!("{}", self.render(Mark::Created, &text));
    }

    pub fn skipped(&self, path: &str, reason: &str) {
        let text = if self.colored {
            format!("{} {}", path.dimmed(), format!("({})", reason).yellow())
        } else {
            format!("{} ({})", path, reason)
        };
        println!("{}", self.render(Mark::Skipped, &text));
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "›".cyan(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// A shell command the user can copy.
    pub fn command(&self, cmd: &str) {
        let line = format!("$ {}", cmd);
        if self.colored {
            println!("     {}", line.bright_cyan());
        } else {
            println!("     {}", line);
        }
    }

    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "✓".green().bold(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    pub fn table_header(&self, columns: &[&str]) {
        let header = pad_columns(columns);
        let rule = table_rule(columns.len(), self.colored);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", rule.dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", rule);
        }
    }

    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", pad_columns(values));
    }

    pub fn newline(&self) {
        println!();
    }
}

fn pad_columns(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("{:<width$}", v, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rule under a table header, as wide as the padded columns.
fn table_rule(columns: usize, colored: bool) -> String {
    let width = (columns * (COLUMN_WIDTH + 1)).saturating_sub(1);
    let ch = if colored { "─" } else { "-" };
    ch.repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_defaults_on() {
        assert!(Output::new().colored);
        assert!(Output::default().colored);
        assert!(!Output::no_color().colored);
    }

    #[test]
    fn plain_lines_use_tags() {
        let output = Output::no_color();
        assert_eq!(output.render(Mark::Ok, "done"), "  [OK] done");
        assert_eq!(output.render(Mark::Fail, "boom"), "  [ERROR] boom");
        assert_eq!(output.render(Mark::Skipped, "x (y)"), "  [SKIPPED] x (y)");
    }

    #[test]
    fn coloured_lines_lead_with_glyphs() {
        let output = Output::new();
        assert!(output.render(Mark::Warn, "careful").contains('⚠'));
        assert!(output.render(Mark::Created, "file").contains('✓'));
    }

    #[test]
    fn columns_pad_to_fixed_width() {
        assert_eq!(pad_columns(&[]), "");
        assert_eq!(pad_columns(&["auth"]).len(), COLUMN_WIDTH);
        assert!(pad_columns(&["auth", "1000"]).starts_with("auth "));
    }

    #[test]
    fn rule_matches_padded_header() {
        let header = pad_columns(&["Operation", "Latency (ms)"]);
        assert_eq!(table_rule(2, false).len(), header.len());
        assert_eq!(table_rule(0, false), "");
    }

    #[test]
    fn every_helper_prints_in_both_modes() {
        for output in [Output::no_color(), Output::new()] {
            output.banner();
            output.success("saved");
            output.info("watching gpu-portal.toml");
            output.warning("latency is zero");
            output.error("bad config");
            output.created("config", "gpu-portal.toml");
            output.skipped(".env", "exists");
            output.header("Mock latency");
            output.subheader("Server");
            output.kv("port", "3000");
            output.hint("run gpu-portal serve");
            output.command("gpu-portal serve");
            output.complete("ready");
            output.table_header(&["Operation", "ms"]);
            output.table_row(&["login", "1000"]);
            output.newline();
        }
    }
}
