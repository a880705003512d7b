use std::path::PathBuf;
use std::process::ExitCode;

use sprite_font::config::{self, Config};
use sprite_font::{LoadError, SpriteStore, load_font, open_fallback, render_preview};

/// Parsed command line.
struct Args {
    sheet: Option<PathBuf>,
    text: String,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    align: Option<String>,
}

fn print_help() {
    println!("sprite_font {}", env!("CARGO_PKG_VERSION"));
    println!("Lay out text with a sprite-sheet font and render a PNG preview\n");
    println!("USAGE:");
    println!("    sprite_font [OPTIONS] <SHEET> <TEXT>\n");
    println!("OPTIONS:");
    println!("    -o, --out <PATH>       Write the rendered preview to PATH");
    println!("    -c, --config <PATH>    Read configuration from PATH");
    println!("    -a, --align <ALIGN>    left, center, or right");
    println!("    --print-config         Print the default configuration to stdout");
    println!("    --version, -V          Print version information");
    println!("    --help, -h             Print this help message");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut out = None;
    let mut config = None;
    let mut align = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| iter.next().cloned().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "-o" | "--out" => out = Some(PathBuf::from(value(arg.as_str())?)),
            "-c" | "--config" => config = Some(PathBuf::from(value(arg.as_str())?)),
            "-a" | "--align" => align = Some(value(arg.as_str())?),
            s if s.starts_with('-') && s.len() > 1 => return Err(format!("unknown option {s}")),
            _ => positional.push(arg.clone()),
        }
    }

    let (sheet, text) = match positional.as_slice() {
        [text] => (None, text.clone()),
        [sheet, text] => (Some(PathBuf::from(sheet)), text.clone()),
        _ => return Err("expected <SHEET> <TEXT>".to_owned()),
    };
    Ok(Args {
        sheet,
        text,
        out,
        config,
        align,
    })
}

fn run(args: Args) -> Result<ExitCode, LoadError> {
    let config_path = args.config.unwrap_or_else(config::config_path);
    let cfg = Config::load(&config_path);

    let Some(sheet) = args.sheet.or_else(|| cfg.font.path.clone()) else {
        log::error!("no sprite sheet given and [font] path is unset");
        return Ok(ExitCode::FAILURE);
    };
    let align = args
        .align
        .as_deref()
        .map_or_else(|| cfg.layout.alignment(), config::parse_alignment);

    let options = cfg.font.options();
    let fallback = open_fallback(&cfg.fallback, options.scale_factor)?;
    let mut store = SpriteStore::new();
    let mut font = load_font(&sheet, &options, fallback, &mut store)?;
    cfg.layout.apply(&mut font);
    font.set_base_scale(cfg.render.pixel_scale);

    let layout = font.layout(&args.text, sprite_font::Position::default(), align);
    println!("width: {:.2}", font.measure(&args.text, None));
    println!("height: {:.2}", font.height());
    for (c, pos) in args.text.chars().zip(&layout.positions) {
        println!("{c:?}\t{:.2}\t{:.2}", pos.x, pos.y);
    }

    if let Some(out) = args.out {
        let image = render_preview(&font, &mut store, &args.text, align, &cfg.render);
        image.save(&out).map_err(|source| LoadError::Save {
            path: out.clone(),
            source,
        })?;
        log::info!("wrote {} ({}x{})", out.display(), image.width(), image.height());
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--print-config") {
        match toml::to_string_pretty(&Config::default()) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("sprite_font {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    let args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}\n");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
