mod settings;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use subalign_core::audio::domain::audio_reader::AudioReader;
use subalign_core::audio::infrastructure::wav_audio_reader::WavAudioReader;
use subalign_core::grammar::infrastructure::fsg_file_writer::FsgFileWriter;
use subalign_core::pipeline::align_cues_use_case::{AlignCuesUseCase, AlignmentMode};
use subalign_core::pipeline::align_error::AlignError;
use subalign_core::pipeline::alignment_reporter::TextAlignmentReporter;
use subalign_core::recognition::domain::decoder_config::DecoderConfig;
use subalign_core::recognition::domain::decoder_session::DecoderSession;
use subalign_core::recognition::infrastructure::whisper_decoder::WhisperDecoder;
use subalign_core::shared::constants::{DEFAULT_GRAMMAR_BASE, SUBTITLE_EXTENSIONS};
use subalign_core::subtitle::infrastructure::parser_factory::read_subtitles;

use settings::{Mode, Settings};

/// Align subtitle cues against an audio track and print per-word timings.
#[derive(Parser)]
#[command(name = "subalign")]
struct Cli {
    /// Input WAV file (16 kHz, 16-bit PCM).
    audio: PathBuf,

    /// Subtitle file (.srt or .vtt).
    subtitles: PathBuf,

    /// Acoustic model (a ggml Whisper model).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Language model file.
    #[arg(long)]
    lm: Option<PathBuf>,

    /// Pronunciation dictionary.
    #[arg(long)]
    dict: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Decoding mode: lm or fsg [default: lm].
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Prefix for per-cue grammar files; `<prefix><start_ms>.fsg`.
    #[arg(long)]
    grammar_prefix: Option<PathBuf>,

    /// Use existing grammar files instead of generating them (fsg mode).
    #[arg(long)]
    no_generate_grammar: bool,

    /// Settings file (default: the user config directory).
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Flags merged over settings.
#[derive(Debug, PartialEq)]
struct Options {
    model: PathBuf,
    language_model: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    log_file: Option<PathBuf>,
    grammar_prefix: PathBuf,
    mode: Mode,
    generate_grammar: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    let options = resolve(&cli, settings)?;
    init_logger(options.log_file.as_deref())?;
    validate(&cli)?;

    let samples = WavAudioReader.read_samples(&cli.audio)?;
    let cues = read_subtitles(&cli.subtitles)?;
    let base_config = build_config(&options)?;

    let mode = match options.mode {
        Mode::Lm => AlignmentMode::LanguageModel,
        Mode::Fsg => {
            if options.generate_grammar {
                FsgFileWriter::new(&options.grammar_prefix).write_all(&cues)?;
            }
            AlignmentMode::Grammar {
                grammar_base: options.grammar_prefix.clone(),
                base_config: base_config.clone(),
            }
        }
    };

    let session = DecoderSession::open::<WhisperDecoder>(&base_config).map_err(AlignError::from)?;
    let reporter = Box::new(TextAlignmentReporter::new(io::stdout()));
    let mut use_case = AlignCuesUseCase::new(mode, reporter);
    let (_, stats) = use_case.execute(session, &cues, &samples)?;

    log::info!(
        "Aligned {} cues in {} mode ({} skipped)",
        stats.aligned,
        options.mode,
        stats.skipped
    );
    Ok(())
}

fn resolve(cli: &Cli, settings: Settings) -> Result<Options, Box<dyn std::error::Error>> {
    let model = cli
        .model
        .clone()
        .or(settings.model)
        .ok_or("An acoustic model is required (--model or settings file)")?;

    Ok(Options {
        model,
        language_model: cli.lm.clone().or(settings.language_model),
        dictionary: cli.dict.clone().or(settings.dictionary),
        log_file: cli.log_file.clone().or(settings.log_file),
        grammar_prefix: cli
            .grammar_prefix
            .clone()
            .or(settings.grammar_prefix)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GRAMMAR_BASE)),
        mode: cli.mode.or(settings.mode).unwrap_or(Mode::Lm),
        generate_grammar: !cli.no_generate_grammar,
    })
}

fn build_config(options: &Options) -> Result<DecoderConfig, AlignError> {
    let mut builder = DecoderConfig::builder(&options.model);
    if let Some(lm) = &options.language_model {
        builder = builder.language_model(lm);
    }
    if let Some(dict) = &options.dictionary {
        builder = builder.dictionary(dict);
    }
    if let Some(log_file) = &options.log_file {
        builder = builder.log_file(log_file);
    }
    Ok(builder.build()?)
}

fn init_logger(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .map_err(|e| format!("Cannot create log file {}: {e}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.audio.exists() {
        return Err(format!("Audio file not found: {}", cli.audio.display()).into());
    }
    if !cli.subtitles.exists() {
        return Err(format!("Subtitle file not found: {}", cli.subtitles.display()).into());
    }
    if !is_subtitle(&cli.subtitles) {
        return Err(format!(
            "Subtitles must be one of: {}, got '{}'",
            SUBTITLE_EXTENSIONS.join(", "),
            cli.subtitles.display()
        )
        .into());
    }
    Ok(())
}

fn is_subtitle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("subalign").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = parse(&["a.wav", "b.srt", "--model", "cli.bin", "--mode", "fsg"]);
        let settings = Settings {
            model: Some(PathBuf::from("settings.bin")),
            dictionary: Some(PathBuf::from("words.dict")),
            mode: Some(Mode::Lm),
            ..Default::default()
        };

        let options = resolve(&cli, settings).unwrap();
        assert_eq!(options.model, PathBuf::from("cli.bin"));
        assert_eq!(options.dictionary, Some(PathBuf::from("words.dict")));
        assert_eq!(options.mode, Mode::Fsg);
        assert!(options.generate_grammar);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["a.wav", "b.srt", "--model", "m.bin"]);
        let options = resolve(&cli, Settings::default()).unwrap();
        assert_eq!(options.mode, Mode::Lm);
        assert_eq!(options.grammar_prefix, PathBuf::from(DEFAULT_GRAMMAR_BASE));
    }

    #[test]
    fn test_grammar_prefix_flag() {
        let cli = parse(&["a.wav", "b.srt", "--model", "m", "--grammar-prefix", "out/fsg_"]);
        let options = resolve(&cli, Settings::default()).unwrap();
        assert_eq!(options.grammar_prefix, PathBuf::from("out/fsg_"));
    }

    #[test]
    fn test_model_is_required() {
        let cli = parse(&["a.wav", "b.srt"]);
        assert!(resolve(&cli, Settings::default()).is_err());
    }

    #[test]
    fn test_no_generate_grammar_flag() {
        let cli = parse(&["a.wav", "b.srt", "--model", "m", "--no-generate-grammar"]);
        assert!(!resolve(&cli, Settings::default()).unwrap().generate_grammar);
    }

    #[test]
    fn test_build_config_missing_model_is_config_failure() {
        let cli = parse(&["a.wav", "b.srt", "--model", "/nonexistent/model.bin"]);
        let options = resolve(&cli, Settings::default()).unwrap();
        assert!(matches!(
            build_config(&options),
            Err(AlignError::ConfigInitFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_subtitle_extension() {
        let tmp = TempDir::new().unwrap();
        let audio = tmp.path().join("a.wav");
        let subs = tmp.path().join("b.ass");
        fs::write(&audio, b"").unwrap();
        fs::write(&subs, b"").unwrap();

        let cli = parse(&[audio.to_str().unwrap(), subs.to_str().unwrap()]);
        let err = validate(&cli).unwrap_err().to_string();
        assert!(err.contains("srt, vtt"), "got: {err}");
    }

    #[test]
    fn test_validate_missing_audio() {
        let cli = parse(&["/nonexistent/a.wav", "/nonexistent/b.srt"]);
        assert!(validate(&cli).unwrap_err().to_string().contains("Audio file"));
    }
}
