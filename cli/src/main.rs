//! reformat CLI - legacy file conversion tool

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use reformat::render::{looks_high_ascii, looks_like_text, to_json, ExamineReport, JsonFormat};
use reformat::{
    Applicability, ConversionTarget, ConvertOptions, FileTypeTag, PartKind, ReformatDispatcher,
    ReformatHolder,
};

#[derive(Parser)]
#[command(name = "reformat")]
#[command(version)]
#[command(about = "Convert legacy Apple II files to RTF, text, and BMP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads a file.
#[derive(clap::Args)]
struct Input {
    /// Data fork of the file
    #[arg(value_name = "FILE")]
    data: PathBuf,

    /// File type, as an abbreviation (TXT, PNT) or a code ($C0, 0x04)
    #[arg(short = 't', long = "type", value_name = "TAG", default_value = "BIN")]
    file_type: String,

    /// Auxiliary type
    #[arg(long, value_name = "AUX", default_value = "0")]
    aux: u16,

    /// Resource fork of the file
    #[arg(long, value_name = "FILE")]
    resource: Option<PathBuf>,

    /// Comment attached to the file
    #[arg(long, value_name = "FILE")]
    comment: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the converters that apply to a file, best first
    Examine {
        #[command(flatten)]
        input: Input,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert one part of a file
    Convert {
        #[command(flatten)]
        input: Input,

        /// Converter to use (best fit if not specified)
        #[arg(short, long, value_name = "NAME")]
        converter: Option<String>,

        /// Part to convert
        #[arg(long, value_enum, default_value = "data")]
        part: Part,

        /// Output plain text instead of RTF
        #[arg(long)]
        plain: bool,

        /// Fold high-bit characters to ASCII (detected if not specified)
        #[arg(long)]
        strip: Option<bool>,

        /// Keep going on truncated data
        #[arg(long)]
        lenient: bool,

        /// Bytes per line in hex dumps
        #[arg(long, default_value = "16")]
        columns: usize,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show file information
    Info {
        #[command(flatten)]
        input: Input,
    },

    /// List registered converters
    Converters,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Part {
    Data,
    Resource,
    Comment,
}

impl From<Part> for PartKind {
    fn from(part: Part) -> Self {
        match part {
            Part::Data => PartKind::Data,
            Part::Resource => PartKind::Resource,
            Part::Comment => PartKind::Comment,
        }
    }
}

/// File contents read from disk, borrowed by a [`ReformatHolder`].
struct LoadedFile {
    name: String,
    file_type: FileTypeTag,
    aux_type: u16,
    data: Vec<u8>,
    resource: Option<Vec<u8>>,
    comment: Option<Vec<u8>>,
}

impl LoadedFile {
    fn load(input: &Input) -> Result<Self, Box<dyn std::error::Error>> {
        let file_type = FileTypeTag::parse(&input.file_type)
            .ok_or_else(|| format!("Invalid file type: {}", input.file_type))?;
        let read_opt = |path: &Option<PathBuf>| path.as_ref().map(fs::read).transpose();

        let data = fs::read(&input.data)?;
        log::debug!(
            "loaded {} as {:?}/{:#06x}, {} bytes",
            input.data.display(),
            file_type,
            input.aux,
            data.len()
        );

        Ok(Self {
            name: display_name(&input.data),
            file_type,
            aux_type: input.aux,
            data,
            resource: read_opt(&input.resource)?,
            comment: read_opt(&input.comment)?,
        })
    }

    fn holder(&self) -> ReformatHolder<'_> {
        let mut holder = ReformatHolder::with_data(self.file_type, &self.data)
            .with_aux_type(self.aux_type)
            .with_name(self.name.clone());
        if let Some(ref resource) = self.resource {
            holder = holder.with_part(PartKind::Resource, resource);
        }
        if let Some(ref comment) = self.comment {
            holder = holder.with_part(PartKind::Comment, comment);
        }
        holder
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Examine { input, json } => cmd_examine(&input, json),
        Commands::Convert {
            input,
            converter,
            part,
            plain,
            strip,
            lenient,
            columns,
            output,
        } => {
            let mut options = ConvertOptions::new()
                .with_rtf(!plain)
                .with_hex_columns(columns);
            if let Some(strip) = strip {
                options = options.with_strip_high_bits(strip);
            }
            if lenient {
                options = options.lenient();
            }
            cmd_convert(
                &input,
                converter.as_deref(),
                part.into(),
                &options,
                output.as_deref(),
            )
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Converters => {
            cmd_converters();
            Ok(())
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_examine(input: &Input, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file = LoadedFile::load(input)?;
    let mut holder = file.holder();
    ReformatDispatcher::with_defaults().examine(&mut holder);

    if json {
        let report = ExamineReport::from_holder(&holder);
        println!("{}", to_json(&report, JsonFormat::Pretty)?);
        return Ok(());
    }

    for part in holder.part_kinds() {
        println!("{} {}", "Part:".cyan().bold(), part);
        let applicable = holder.applicable(part);
        if applicable.is_empty() {
            println!("  {}", "no applicable converters".dimmed());
        }
        for (name, applicability) in applicable {
            println!("  {:<12} {}", name, color_applicability(applicability));
        }
    }

    Ok(())
}

fn color_applicability(applicability: Applicability) -> colored::ColoredString {
    let label = format!("{:?}", applicability);
    match applicability {
        Applicability::Yes => label.green().bold(),
        Applicability::Probably => label.green(),
        Applicability::ProbablyNot => label.yellow(),
        Applicability::Always => label.dimmed(),
        Applicability::Not => label.red(),
    }
}

fn cmd_convert(
    input: &Input,
    converter: Option<&str>,
    part: PartKind,
    options: &ConvertOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = LoadedFile::load(input)?;
    let mut holder = file.holder();
    let dispatcher = ReformatDispatcher::with_defaults();
    dispatcher.examine(&mut holder);

    let target = match converter {
        Some(name) => dispatcher.process(&holder, name, part, options)?,
        None => dispatcher.process_best(&holder, part, options)?,
    };

    match output {
        Some(path) => {
            fs::write(path, target.to_bytes()?)?;
            println!("{} {}", "Saved to".green(), path.display());
        }
        None => match target {
            ConversionTarget::Document(ref doc) => {
                // Raw bytes: RTF output is Windows-1252, not UTF-8.
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(doc.as_bytes())?;
                stdout.flush()?;
            }
            ConversionTarget::Bitmap(_) => {
                let path = PathBuf::from(format!("{}.{}", file.name, target.extension()));
                fs::write(&path, target.to_bytes()?)?;
                println!("{} {}", "Saved to".green(), path.display());
            }
        },
    }

    Ok(())
}

fn cmd_info(input: &Input) -> Result<(), Box<dyn std::error::Error>> {
    let file = LoadedFile::load(input)?;

    println!("{}", "File Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.data.display());
    println!(
        "{}: {} (${:02X})",
        "Type".bold(),
        file.file_type,
        file.file_type.code()
    );
    println!("{}: ${:04X}", "Aux Type".bold(), file.aux_type);
    println!("{}: {} bytes", "Data".bold(), file.data.len());
    if let Some(ref resource) = file.resource {
        println!("{}: {} bytes", "Resource".bold(), resource.len());
    }
    if let Some(ref comment) = file.comment {
        println!("{}: {} bytes", "Comment".bold(), comment.len());
    }

    println!();
    println!("{}", "Content".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    println!("{}: {}", "Looks like text".bold(), yes_no(looks_like_text(&file.data)));
    println!("{}: {}", "High ASCII".bold(), yes_no(looks_high_ascii(&file.data)));

    Ok(())
}

fn cmd_converters() {
    let dispatcher = ReformatDispatcher::with_defaults();
    for name in dispatcher.names() {
        let family = match dispatcher.get_by_name(name) {
            Some(converter) if converter.is_graphics() => "graphics",
            _ => "document",
        };
        println!("{:<12} {}", name, family.dimmed());
    }
}

fn cmd_version() {
    println!("{} {}", "reformat".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Legacy file conversion tool");
    println!();
    println!("License: MIT");
}
