use std::path::PathBuf;
use std::process::exit;

use lamina::Config;

struct Args {
    config: PathBuf,
    description: PathBuf,
    out_dir: PathBuf,
}

fn usage() -> ! {
    eprintln!("Usage: lamina --config <stack.toml> <description.gif> <out-dir>");
    eprintln!();
    eprintln!("Reads a multi-frame GIF plate description and writes one SVG of");
    eprintln!("cutting geometry per configured layer, plus a composite overview.");
    exit(1);
}

fn parse_args() -> Args {
    let mut config = None;
    let mut positional = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => usage(),
            "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--config needs a path");
                    usage();
                }
            },
            _ if arg.starts_with('-') => {
                eprintln!("unknown option: {arg}");
                usage();
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let Some(config) = config else {
        eprintln!("--config is required");
        usage();
    };
    let [description, out_dir] = positional.try_into().unwrap_or_else(|_| {
        eprintln!("expected exactly two arguments: the description GIF and the output directory");
        usage();
    });

    Args {
        config,
        description,
        out_dir,
    }
}

fn main() -> miette::Result<()> {
    let args = parse_args();

    let config = Config::from_path(&args.config)?;
    let written = lamina::process(&args.description, &config, &args.out_dir)?;

    for path in &written {
        println!("{}", path.display());
    }

    Ok(())
}
