//! texbox CLI - lay out LaTeX math markup and print the measured box tree

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use texbox::{Formula, HAlign, LayoutOptions, MathStyle};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tbx")]
#[command(version)]
#[command(about = "texbox - lay out LaTeX math with TeX's rules and print the box tree", long_about = None)]
struct Cli {
    /// Formula markup (reads --file or stdin if not provided)
    formula: Option<String>,

    /// Read the formula from a file
    #[arg(short, long)]
    file: Option<String>,

    /// Font size in points
    #[arg(short, long, default_value_t = 20.0)]
    size: f64,

    /// Style the formula starts in
    #[arg(long, value_enum, default_value_t = Style::Display)]
    style: Style,

    /// Text width in points
    #[arg(short, long)]
    width: Option<f64>,

    /// Alignment inside the text width
    #[arg(long, value_enum, default_value_t = Align::Center)]
    align: Align,

    /// Break wide formulas with this spacing between lines (requires --width)
    #[arg(long)]
    interline: Option<f64>,

    /// Keep the valid prefix of broken markup instead of failing
    #[arg(long)]
    partial: bool,

    /// Print the box tree as JSON
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Style {
    Display,
    Text,
    Script,
    Scriptscript,
}

#[cfg(feature = "cli")]
impl From<Style> for MathStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Display => MathStyle::Display,
            Style::Text => MathStyle::Text,
            Style::Script => MathStyle::Script,
            Style::Scriptscript => MathStyle::ScriptScript,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Align {
    Left,
    Center,
    Right,
}

#[cfg(feature = "cli")]
impl From<Align> for HAlign {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => HAlign::Left,
            Align::Center => HAlign::Center,
            Align::Right => HAlign::Right,
        }
    }
}

fn read_input(formula: Option<String>, file: Option<&str>) -> io::Result<String> {
    if let Some(formula) = formula {
        return Ok(formula);
    }
    if let Some(path) = file {
        return fs::read_to_string(path);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let input = match read_input(cli.formula, cli.file.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let formula = if cli.partial {
        Formula::partial(input.trim())
    } else {
        match Formula::parse(input.trim()) {
            Ok(formula) => formula,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let mut options = LayoutOptions::display(cli.size).with_style(cli.style.into());
    if let Some(width) = cli.width {
        options = options.with_width(width, cli.align.into());
    }
    if let Some(interline) = cli.interline {
        options = options.with_interline(interline);
    }

    let icon = match formula.create_icon(&options) {
        Ok(icon) => icon,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&icon) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing layout: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "width={:.3} height={:.3} depth={:.3} colored={}",
            icon.width(),
            icon.height(),
            icon.depth(),
            icon.is_colored()
        );
        print!("{}", icon.root.dump());
    }
    ExitCode::SUCCESS
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
}
