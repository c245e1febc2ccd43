use std::{
   fs,
   io::{
      self,
      Read as _,
      Write as _,
   },
   path::PathBuf,
   process,
};

use anyhow::Context as _;
use clap::Parser as _;
use tracing_subscriber::EnvFilter;
use wreck::{
   ColorChoice,
   Config,
   Diagnostic,
   Output as _,
};
use yansi::Paint as _;

#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
   #[command(subcommand)]
   command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
   /// Render a report and exit with status 1.
   Render {
      /// The source file to show.
      #[arg(long)]
      file: Option<PathBuf>,

      /// The failing line, starting from 1. 0 shows no source.
      #[arg(long, default_value_t = 0)]
      line: usize,

      /// A substring of the failing line to underline. Can be repeated.
      #[arg(long = "mark")]
      marks: Vec<String>,

      /// The error kind shown in the top rule.
      #[arg(long, default_value = "Error")]
      kind: String,

      /// A TOML file to read the settings from.
      #[arg(long)]
      config: Option<PathBuf>,

      #[arg(long, value_enum)]
      color: Option<ColorChoice>,

      /// Draw with ASCII glyphs instead of box drawing ones.
      #[arg(long)]
      ascii: bool,

      /// The width of every row.
      #[arg(long)]
      width: Option<usize>,

      /// The error message. May contain a documentation code like
      /// '<Hex(12.E)>: '.
      message: String,
   },

   /// Various commands related to debugging.
   Dump {
      #[command(subcommand)]
      command: Dump,

      /// The Helix source to dump. If set to '-', stdin is read.
      #[clap(default_value = "-", global = true)]
      source: String,
   },

   /// Print Helix source highlighted.
   Highlight {
      #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
      color: ColorChoice,

      /// If set to '-', stdin is read.
      #[clap(default_value = "-")]
      source: String,
   },
}

#[derive(clap::Subcommand, Debug, Clone, Copy)]
enum Dump {
   /// Dump the provided source's tokens.
   Tokens {
      /// If specified, the output will be colored instead of typed.
      #[arg(long, short)]
      color: bool,
   },
}

const FAIL_STDOUT: &str = "failed to write to stdout";

/// Writes the error chain, innermost cause first.
fn write_chain(writer: &mut impl io::Write, error: &anyhow::Error) -> io::Result<()> {
   let mut chain = error.chain().rev().peekable();

   while let Some(error) = chain.next() {
      let header = if chain.peek().is_none() {
         "error:"
      } else {
         "cause:"
      };

      let message = error.to_string();
      let mut chars = message.chars();

      // Lowercase the first letter unless it starts an acronym.
      let message = match (chars.next(), chars.next()) {
         (Some(first), Some(second)) if second.is_lowercase() => {
            format!("{first}{rest}", first = first.to_lowercase(), rest = &message[first.len_utf8()..])
         },

         _ => message,
      };

      writeln!(writer, "{header} {message}", header = header.red().bold())?;
   }

   Ok(())
}

/// Prints the error chain and exits with failure.
struct Termination(anyhow::Result<()>);

impl process::Termination for Termination {
   fn report(self) -> process::ExitCode {
      let Err(error) = self.0 else {
         return process::ExitCode::SUCCESS;
      };

      let _ = write_chain(&mut io::stderr().lock(), &error);

      process::ExitCode::FAILURE
   }
}

fn read_source(source: &str) -> anyhow::Result<String> {
   if source == "-" {
      let mut contents = String::new();
      io::stdin()
         .read_to_string(&mut contents)
         .context("failed to read stdin")?;

      Ok(contents)
   } else {
      fs::read_to_string(source).with_context(|| format!("failed to read '{source}'"))
   }
}

fn formatter(color: ColorChoice) -> glint::Formatter {
   let supported = io::stdout().supports_color();

   if !color.enabled(supported) {
      return glint::Formatter::plain();
   }

   glint::Formatter::one_dark(if supported {
      glint::Depth::TrueColor
   } else {
      glint::Depth::Ansi256
   })
}

fn run(cli: Cli) -> anyhow::Result<()> {
   let out = &mut io::stdout().lock();

   match cli.command {
      Command::Render {
         file,
         line,
         marks,
         kind,
         config: config_path,
         color,
         ascii,
         width,
         message,
      } => {
         let mut config = match config_path {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
         };

         if let Some(color) = color {
            config.color = color;
         }
         if ascii {
            config.unicode = false;
         }
         if let Some(width) = width {
            config.width = width;
         }

         let mut diagnostic = Diagnostic::custom(kind, message).marks(marks);
         if let Some(file) = file {
            diagnostic = diagnostic.at(file, line);
         }

         match wreck::panic(&diagnostic, &config)? {}
      },

      Command::Dump {
         command: Dump::Tokens { color },
         source,
      } => {
         let source = read_source(&source)?;
         let lexer = glint::helix::lexer();

         if color {
            let formatter = formatter(ColorChoice::Always);

            write!(out, "{}", glint::highlight(&source, lexer, &formatter))
         } else {
            lexer
               .tokenize(&source)
               .try_for_each(|(category, text)| writeln!(out, "{category} {text:?}"))
         }
         .context(FAIL_STDOUT)?;
      },

      Command::Highlight { color, source } => {
         let source = read_source(&source)?;

         write!(
            out,
            "{}",
            glint::highlight(&source, glint::helix::lexer(), &formatter(color)),
         )
         .context(FAIL_STDOUT)?;
      },
   }

   out.flush().context(FAIL_STDOUT)
}

fn main() -> Termination {
   tracing_subscriber::fmt()
      .with_env_filter(
         EnvFilter::try_from_env("WRECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
      )
      .with_writer(io::stderr)
      .init();

   yansi::whenever(yansi::Condition::STDERR_IS_TTY);

   Termination(run(Cli::parse()))
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn chain_is_printed_innermost_first() {
      let error = anyhow::Error::new(io::Error::other("Disk is gone"))
         .context("Failed to read 'config.hlx'")
         .context("IO failed");

      let mut written = Vec::new();
      write_chain(&mut written, &error).unwrap();

      let written = String::from_utf8(written).unwrap();
      let lines = written.lines().collect::<Vec<_>>();

      assert_eq!(lines.len(), 3);
      assert!(lines[0].contains("cause:") && lines[0].ends_with(" disk is gone"));
      assert!(lines[1].contains("cause:") && lines[1].ends_with(" failed to read 'config.hlx'"));
      // Acronyms keep their case.
      assert!(lines[2].contains("error:") && lines[2].ends_with(" IO failed"));
   }

   #[test]
   fn missing_source_names_the_path() {
      let directory = tempfile::tempdir().unwrap();
      let path = directory.path().join("missing.hlx");
      let path = path.to_str().unwrap();

      let error = read_source(path).unwrap_err();

      assert_eq!(error.to_string(), format!("failed to read '{path}'"));
      assert!(error.downcast_ref::<io::Error>().is_some());
   }
}
