//  TWEETY.rs
//    by Lut99
//
//  Created:
//    03 May 2024, 14:14:18
//  Last edited:
//    16 Oct 2026, 16:02:37
//  Auto updated?
//    Yes
//
//  Description:
//!   Walks through the classic "can Tweety fly?" example: derives what
//!   follows from some birds, asks about them, and then retracts one to
//!   show its conclusions disappearing with it.
//

use clap::Parser;
use console::style;
use error_trace::toplevel;
use forward_tms::ast::{Statement, Term, kb};
use forward_tms::interpreter::{Config, KnowledgeBase, Retraction};
use humanlog::{DebugMode, HumanLogger};
use log::{debug, error, info};


/***** ARGUMENTS *****/
/// Defines arguments to the demo.
#[derive(Debug, Parser)]
pub struct Arguments {
    /// If given, enables more verbose logging (including every derivation and removal).
    #[clap(long, global = true)]
    debug: bool,

    /// If given, does not retract anything after querying.
    #[clap(short, long)]
    keep:  bool,
    /// The unary predicate to ask about.
    #[clap(short, long, default_value = "can-fly")]
    query: String,
}





/***** ENTRYPOINT *****/
fn main() {
    // Parse the CLI arguments
    let args = Arguments::parse();

    // Setup the logger
    if let Err(err) = HumanLogger::terminal(if args.debug { DebugMode::Full } else { DebugMode::HumanFriendly }).init() {
        eprintln!("WARNING: Failed to setup logger: {err} (no logging for this session)");
    }
    info!("{} tweety - v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    // Build the knowledge base
    let config: Config = if args.debug { Config::verbose() } else { Config::default() };
    let mut kb = KnowledgeBase::with_config(config);
    let entries = kb! {
        isa(tweety, bird).
        isa(polly, bird).
        isa(nemo, fish).
        "can-fly"(?x) :- isa(?x, bird).
        sings(?x) :- isa(?x, bird), happy(?x).
        happy(tweety).
    };
    for entry in entries {
        debug!("Asserting {entry}...");
        kb.assert(entry);
    }
    println!("{kb}");

    // Ask who does what we're asked about
    let query = Statement::new(args.query.as_str(), [Term::var("who")]);
    println!("{} {}", style("Asking").bold().green(), style(&query).bold());
    for answer in kb.ask(query.clone()) {
        println!(" - {answer}");
    }
    println!();
    if args.keep {
        return;
    }

    // Tweety turns out to be a plane
    let tweety = Statement::new("isa", [Term::constant("tweety"), Term::constant("bird")]);
    println!("{} {}", style("Retracting").bold().red(), style(&tweety).bold());
    match kb.retract(tweety.clone()) {
        Ok(Retraction::Removed(entries)) => {
            for entry in entries {
                println!(" - removed {entry}");
            }
        },
        Ok(other) => println!(" - {other:?}"),
        Err(err) => {
            error!("{}", toplevel!(("Failed to retract '{}'", tweety), err));
            std::process::exit(1);
        },
    }
    println!();
    println!("{kb}");

    println!("{} {}", style("Asking").bold().green(), style(&query).bold());
    for answer in kb.ask(query) {
        println!(" - {answer}");
    }
}
