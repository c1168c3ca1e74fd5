use descript_ion::{DescriptError, DescriptionStore, DialectMode, StoreOptions};
use std::env;

const USAGE: &str = "<directory> [--dialect <tc|dc|auto>] [--encoding <label>] \
<list | get <name> | set <name> <comment> | remove <name> | prune | sort>";

fn build_options(args: &mut Vec<String>) -> Result<StoreOptions, DescriptError> {
    let mut options = StoreOptions::default();

    if let Ok(dialect) = env::var("DESCRIPT_ION_DIALECT") {
        options = options.with_dialect(dialect.parse::<DialectMode>()?);
    }
    if let Ok(label) = env::var("DESCRIPT_ION_ENCODING") {
        options = options.with_fallback_label(&label)?;
    }

    // Command-line flags take precedence over the environment
    if let Some(idx) = args.iter().position(|arg| arg == "--dialect") {
        let value = args.get(idx + 1).cloned().ok_or_else(|| {
            DescriptError::InvalidArgument("--dialect flag requires an argument".to_string())
        })?;
        options = options.with_dialect(value.parse::<DialectMode>()?);
        args.drain(idx..idx + 2);
    }
    if let Some(idx) = args.iter().position(|arg| arg == "--encoding") {
        let value = args.get(idx + 1).cloned().ok_or_else(|| {
            DescriptError::InvalidArgument("--encoding flag requires an argument".to_string())
        })?;
        options = options.with_fallback_label(&value)?;
        args.drain(idx..idx + 2);
    }

    Ok(options)
}

fn run(mut args: Vec<String>) -> Result<(), DescriptError> {
    let options = build_options(&mut args)?;
    let dir = args
        .first()
        .ok_or_else(|| DescriptError::InvalidArgument("missing directory".to_string()))?;
    let command = args.get(1).map(String::as_str).unwrap_or("list");

    let mut store = DescriptionStore::with_options(dir, options)?;
    let found = store.load()?;

    match (command, args.get(2..).unwrap_or_default()) {
        ("list", []) => {
            if !found {
                println!("No {} in {}", store.options().file_name, dir);
                return Ok(());
            }
            println!(
                "{} ({}, {})",
                store.path().display(),
                store.dialect(),
                store.encoding().unwrap_or_default()
            );
            println!("{}", "=".repeat(60));
            for entry in store.entries() {
                println!("{}: {}", entry.name, entry.comment.replace('\n', "\n    "));
            }
        }
        ("get", [name]) => match store.get_comment(name) {
            Some(comment) => println!("{}", comment),
            None => println!("(no comment for {})", name),
        },
        ("set", [name, comment]) => {
            // Command-line comments spell line breaks as a literal \n
            store.set_comment(name, &comment.replace("\\n", "\n"))?;
            store.save()?;
        }
        ("remove", [name]) => {
            if store.remove_comment(name)? {
                store.save()?;
            } else {
                println!("(no comment for {})", name);
            }
        }
        ("prune", []) => {
            let removed = store.remove_orphaned_entries();
            if removed > 0 {
                store.save()?;
            }
            println!("Removed {} orphaned entries", removed);
        }
        ("sort", []) => {
            store.sort();
            store.save()?;
        }
        _ => {
            return Err(DescriptError::InvalidArgument(format!(
                "unrecognised command: {}",
                args[1..].join(" ")
            )));
        }
    }

    Ok(())
}

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    if args.is_empty() {
        eprintln!("Usage: {} {}", program, USAGE);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        eprintln!("ERROR: {}", e);
        eprintln!("Usage: {} {}", program, USAGE);
        std::process::exit(1);
    }
}
