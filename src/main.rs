use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_biotriage::cli::{Cli, Commands};
use kira_biotriage::ctx::Ctx;
use kira_biotriage::io;
use kira_biotriage::pipeline::Pipeline;
use kira_biotriage::pipeline::stage0_scaffold::Stage0Scaffold;
use kira_biotriage::pipeline::stage1_input::Stage1Input;
use kira_biotriage::pipeline::stage2_cascade::Stage2Cascade;
use kira_biotriage::pipeline::stage3_evaluate::Stage3Evaluate;
use kira_biotriage::pipeline::stage4_search::Stage4Search;
use kira_biotriage::pipeline::stage5_output::Stage5Output;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let mut ctx = Ctx::new(
                args.input,
                args.out,
                args.json,
                args.tsv,
                env!("CARGO_PKG_VERSION"),
            );
            ctx.threads = args.threads;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage2Cascade::new()),
                Box::new(Stage3Evaluate::new()),
                Box::new(Stage5Output::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print!("{}", io::summary::format_summary(&ctx)?);
            print_warnings(&ctx);
        }
        Commands::Search(args) => {
            let mut ctx = Ctx::new(
                args.input,
                args.out,
                args.json,
                args.tsv,
                env!("CARGO_PKG_VERSION"),
            );
            ctx.threads = args.threads;
            ctx.grid_path = args.grid;
            ctx.min_sensitivity = args.min_sensitivity;
            ctx.top_n = args.top;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage4Search::new()),
                Box::new(Stage5Output::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print!("{}", io::summary::format_search_summary(&ctx)?);
            print_warnings(&ctx);
        }
        Commands::Validate(args) => {
            let mut ctx = Ctx::new(
                args.input,
                PathBuf::from("."),
                false,
                false,
                env!("CARGO_PKG_VERSION"),
            );
            let pipeline = Pipeline::new(vec![Box::new(Stage1Input::new())]);
            pipeline.run(&mut ctx)?;

            println!("kira-biotriage validate ok");
            println!("records: {}", ctx.records.len());
            println!("true danger: {}", ctx.input_meta.true_danger.unwrap_or(0));
            print_warnings(&ctx);
        }
    }

    Ok(())
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
