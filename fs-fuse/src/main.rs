#[macro_use]
extern crate clap;

use std::io::Write;
use std::path::Path;
use std::process::exit;

use clap::{Arg, ArgMatches, SubCommand};
use flat_fs::FlatFileSystem;
use flat_fs_fuse::{cat, list, map_image, pack_dir, write_image, Result};

fn main() {
    env_logger::init();
    let matches = app_from_crate!()
        .subcommand(
            SubCommand::with_name("pack")
                .about("pack a directory of files into an image")
                .arg(
                    Arg::with_name("source")
                        .short("s")
                        .long("source")
                        .takes_value(true)
                        .required(true)
                        .help("directory whose regular files are packed"),
                )
                .arg(
                    Arg::with_name("target")
                        .short("t")
                        .long("target")
                        .takes_value(true)
                        .required(true)
                        .help("path of the image to write"),
                )
                .arg(
                    Arg::with_name("rtc")
                        .long("rtc")
                        .help("add an \"rtc\" device entry"),
                ),
        )
        .subcommand(
            SubCommand::with_name("ls")
                .about("list the directory of an image")
                .arg(Arg::with_name("image").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("cat")
                .about("write a file from an image to stdout")
                .arg(Arg::with_name("image").required(true).index(1))
                .arg(Arg::with_name("name").required(true).index(2)),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("pack", Some(m)) => run_pack(m),
        ("ls", Some(m)) => run_ls(m),
        ("cat", Some(m)) => run_cat(m),
        _ => {
            eprintln!("{}", matches.usage());
            exit(2);
        }
    };
    if let Err(e) = result {
        eprintln!("flat-fs-fuse: {}", e);
        exit(1);
    }
}

fn run_pack(m: &ArgMatches) -> Result<()> {
    // both are required, clap has already rejected missing values
    let source = Path::new(m.value_of("source").unwrap_or_default());
    let target = Path::new(m.value_of("target").unwrap_or_default());
    let image = pack_dir(source, m.is_present("rtc"))?;
    write_image(&image, target)?;
    log::info!("wrote {} bytes to {}", image.len(), target.display());
    Ok(())
}

fn run_ls(m: &ArgMatches) -> Result<()> {
    let image = map_image(Path::new(m.value_of("image").unwrap_or_default()))?;
    let efs = FlatFileSystem::mount(&image)?;
    for line in list(&efs)? {
        println!("{}", line);
    }
    Ok(())
}

fn run_cat(m: &ArgMatches) -> Result<()> {
    let image = map_image(Path::new(m.value_of("image").unwrap_or_default()))?;
    let efs = FlatFileSystem::mount(&image)?;
    let data = cat(&efs, m.value_of("name").unwrap_or_default())?;
    std::io::stdout().write_all(&data)?;
    Ok(())
}
