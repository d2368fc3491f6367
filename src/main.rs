mod cli;
mod error;
mod playstore;
mod resolver;
mod store;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var("APKWATCH_VERBOSE", "1");
        }
    }

    let result = workflow::resolve_data_dir(cli.data_dir).and_then(|data_dir| {
        if let Some(package_id) = cli.package.as_deref() {
            workflow::execute_add(data_dir, package_id)
        } else if let Some(package_id) = cli.delete.as_deref() {
            workflow::execute_delete(data_dir, package_id)
        } else if cli.list {
            workflow::execute_list(data_dir)
        } else {
            workflow::execute_check(data_dir)
        }
    });

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
