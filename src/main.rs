use clap::{Parser, Subcommand};
use prompt_shell::config::ShellConfig;
use prompt_shell::routes::{RouteTable, default_routes};
use prompt_shell::{config, export, output, router, script, shell};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prompt-shell")]
#[command(about = "Headless SPA shell for a prompt template catalog")]
#[command(long_about = "\
Headless SPA shell for a prompt template catalog

Routes form a tree. Inner nodes are layouts whose views wrap the matched
child; the stock table:

  /                    Home [layout]
  ├── (index)          Dashboard
  ├── history          History
  ├── settings         Settings
  ├── prompts          Prompts
  └── prompts/create   PromptsCreate
  /login               Login

Matching backtracks, first match wins: literal segments beat :params,
:params beat the index route, *catch-alls come last. Declaration order
breaks ties.

Demo scripts drive a session, one command per line ('#' comments):

  goto /prompts
  goto @prompts-create
  add p11 Writing Weekly Review -- Summarize the week in five bullets.
  back
  forward

Run 'prompt-shell gen-config' to print a documented prompt-shell.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./prompt-shell.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the route table with export counts and warnings
    Routes,
    /// Resolve a path against the route table
    Resolve {
        /// Path to resolve, e.g. /prompts/create
        path: String,
        /// Emit the matched chain as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a command script through a session and print each outcome
    Demo {
        /// Script file (defaults to the built-in demo script)
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Render every concrete route to static HTML
    Export {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Validate config, routes, views, and seed data without running anything
    Check,
    /// Print a stock prompt-shell.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Routes => {
            let table = RouteTable::build(default_routes())?;
            output::print_route_tree(&table);
        }
        Command::Resolve { path, json } => {
            let table = RouteTable::build(default_routes())?;
            match router::resolve(&table, &path) {
                Some(chain) => {
                    if json {
                        println!("{}", output::resolution_json(&table, &chain)?);
                    } else {
                        output::print_resolution(&table, &path, Some(&chain));
                    }
                }
                None => {
                    output::print_resolution(&table, &path, None);
                    std::process::exit(1);
                }
            }
        }
        Command::Demo { script: file } => {
            let config = ShellConfig::load(cli.config.as_deref())?;
            let mut session = shell::Session::start(config)?;
            let source = match &file {
                Some(path) => std::fs::read_to_string(path)?,
                None => script::demo_script().to_string(),
            };
            let events = script::parse_script(&source)?;

            for event in events {
                println!("> {event}");
                let outcome = session.handle(event);
                output::print_outcome(session.table(), &outcome);
                for notice in session.drain_notices() {
                    println!("{}", output::format_notice(&notice));
                }
                println!();
            }

            println!("Final location: {}", session.current_url());
            println!(
                "History: {}",
                session.router().history().join(" \u{2192} ")
            );
            println!("Catalog: {} templates", session.catalog().len());
        }
        Command::Export { output: out_dir } => {
            let config = ShellConfig::load(cli.config.as_deref())?;
            let session = shell::Session::start(config)?;
            let report = export::export(
                session.table(),
                session.registry(),
                session.catalog(),
                &out_dir,
            )?;
            output::print_export_report(&report);
            println!("==> Export complete: {}", out_dir.display());
        }
        Command::Check => {
            let config = ShellConfig::load(cli.config.as_deref())?;
            let session = shell::Session::start(config)?;
            output::print_route_tree(session.table());
            println!();
            println!(
                "==> {} routes, {} views, {} seed templates",
                session.table().len(),
                session.registry().len(),
                session.catalog().len()
            );
            println!("==> Shell is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
