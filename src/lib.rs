pub mod cli;
pub mod compiler;
pub mod config;
pub mod panel;
pub mod sink;

use anyhow::Context;
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_BORDERS_ONLY};

pub use cli::{AllArg, Cli, ColorMode, Commands, SetArg, cli_parse};
pub use compiler::{FOLDER_PATH_LABEL, compile, compile_group, normalize, panel_warnings};
pub use config::{ConfigError, PanelConfig, load_config, load_config_from_path};
pub use panel::{Control, ControlState, Group, Panel, PanelError};
pub use sink::{CommandSink, InjectionSink, SinkError, StdoutSink, escape};

/// Apply CLI state overrides on top of the configured panel.
///
/// `--all` cascades run first so `--set` can still pin individual controls
/// afterwards.
fn apply_overrides(panel: &mut Panel, set: &[SetArg], all: &[AllArg]) -> Result<(), PanelError> {
    for arg in all {
        panel.apply_group_toggle(&arg.group, arg.state)?;
    }
    for arg in set {
        panel.set_state(&arg.group, &arg.control, arg.state)?;
    }
    Ok(())
}

fn print_panel_warnings(panel: &Panel, quiet: bool) {
    if quiet {
        return;
    }
    for warning in panel_warnings(panel) {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
}

fn write_output_file(path: &std::path::Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

fn state_cell(state: ControlState) -> Cell {
    let cell = Cell::new(state.to_string());
    match state {
        ControlState::Include => cell.fg(Color::Green),
        ControlState::Exclude => cell.fg(Color::Red),
        ControlState::Neutral => cell.fg(Color::DarkGrey),
    }
}

fn display_panel_info(panel_name: &str, panel: &Panel) {
    println!("{} ({})", "PANEL".bold().bright_white(), panel_name);

    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Group", "Control", "State"]);

    for group in panel.groups() {
        let label = if group.no_blanks {
            format!("{} [no blanks]", group.label)
        } else {
            group.label.clone()
        };
        for control in group.members() {
            table.add_row(vec![
                Cell::new(&label),
                Cell::new(&control.name),
                state_cell(control.state),
            ]);
        }
        if group.is_empty() {
            table.add_row(vec![Cell::new(&label), Cell::new("-"), Cell::new("-")]);
        }
    }
    println!("{table}");

    println!("\n{}", "CONTRIBUTIONS".bold());
    for group in panel.groups() {
        let contribution = compile_group(group);
        if contribution.is_empty() {
            println!("  {}: {}", group.label, "(empty)".dimmed());
        } else {
            println!("  {}: {}", group.label, contribution);
        }
    }

    let filter = compile(panel);
    if filter.is_empty() {
        println!("\n{} {}", "Filter:".bold(), "(empty)".dimmed());
    } else {
        println!("\n{} {}", "Filter:".bold(), filter.green());
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();

    // Set up color handling based on user preference
    match cli.color {
        ColorMode::Always => unsafe {
            std::env::set_var("CLICOLOR_FORCE", "1");
        },
        ColorMode::Never => unsafe {
            std::env::set_var("NO_COLOR", "1");
        },
        ColorMode::Auto => {}
    }

    let panel_config =
        load_config(cli.config.as_deref()).context("Failed to load panel config")?;

    if cli.verbose > 0 && !cli.quiet {
        eprintln!("Panel: {}", panel_config.panel_name);
        if let Some(config_path) = &cli.config {
            eprintln!("Config file: {}", config_path.display());
        }
        if !panel_config.sink.command.is_empty() {
            eprintln!("Sink command: {}", panel_config.sink.command.join(" "));
        }
    }

    let mut panel = panel_config
        .build_panel()
        .context("Failed to build panel from config")?;

    match &cli.command {
        Commands::Build {
            set,
            all,
            escaped,
            output,
        } => {
            apply_overrides(&mut panel, set, all)?;
            print_panel_warnings(&panel, cli.quiet);

            let filter = compile(&panel);
            let text = if *escaped { escape(&filter) } else { filter };
            println!("{}", text);
            if let Some(path) = output {
                write_output_file(path, &text)?;
            }
        }
        Commands::Send { set, all, dry_run } => {
            apply_overrides(&mut panel, set, all)?;
            print_panel_warnings(&panel, cli.quiet);

            let filter = compile(&panel);
            let escaped = escape(&filter);

            if *dry_run {
                StdoutSink.send(&escaped)?;
            } else {
                let command_sink = CommandSink::new(panel_config.sink.command.clone());
                command_sink
                    .send(&escaped)
                    .context("Failed to transmit filter to the target application")?;
                if !cli.quiet {
                    eprintln!("{} {}", "Sent:".green().bold(), filter);
                }
            }
        }
        Commands::Info => {
            display_panel_info(&panel_config.panel_name, &panel);
        }
    }

    Ok(())
}
