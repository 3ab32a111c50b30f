use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use snipsync_cli::Commands;
use snipsync_cli::OutputFormat;
use snipsync_cli::SnipCli;
use snipsync_core::AnyEmptyResult;
use snipsync_core::AnyResult;
use snipsync_core::MarkerSyntax;
use snipsync_core::ScanOptions;
use snipsync_core::SnipConfig;
use snipsync_core::SnipError;
use snipsync_core::SyncOptions;
use snipsync_core::SyncResult;
use snipsync_core::TEMPLATE_HELP;
use snipsync_core::TemplateRenderer;
use snipsync_core::collect_files;
use snipsync_core::expand_newlines;
use snipsync_core::load_documents;
use snipsync_core::parse_documents;
use snipsync_core::sync_documents;
use snipsync_core::validate_template;
use snipsync_core::write_changes;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SnipCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Update {
			paths,
			dry_run,
			watch,
		}) => run_update(&args, paths, *dry_run, *watch),
		Some(Commands::Check {
			paths,
			diff,
			format,
		}) => run_check(&args, paths, *diff, *format),
		Some(Commands::List { paths }) => run_list(&args, paths),
		Some(Commands::Templates) => run_templates(&args),
		None => {
			eprintln!("No subcommand specified. Run `snipsync --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<SnipError>() {
			Ok(snip_err) => {
				let report: miette::Report = (*snip_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr. `SNIPSYNC_LOG` takes precedence over `RUST_LOG`.
fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose { "info" } else { "warn" };
	let filter = EnvFilter::try_from_env("SNIPSYNC_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

/// Everything a run needs, merged from config and command line flags.
struct Settings {
	scan: ScanOptions,
	sync: SyncOptions,
}

fn load_config(args: &SnipCli) -> AnyResult<Option<SnipConfig>> {
	let config = match &args.config {
		Some(path) => Some(SnipConfig::load_from(path)?),
		None => SnipConfig::load(&std::env::current_dir()?)?,
	};

	Ok(config)
}

fn load_settings(args: &SnipCli) -> AnyResult<Settings> {
	let config = load_config(args)?;

	let template = args
		.template
		.clone()
		.or_else(|| config.as_ref().and_then(|c| c.template.clone()))
		.unwrap_or_default();
	if !template.is_empty() {
		validate_template(&template)?;
	}

	let syntax = args
		.syntax
		.or_else(|| config.as_ref().and_then(|c| c.syntax))
		.unwrap_or_default();

	let renderer = match &config {
		Some(config) => TemplateRenderer::default().prepend(config.templates.iter().cloned()),
		None => TemplateRenderer::default(),
	};

	Ok(Settings {
		scan: ScanOptions::from_config(config.as_ref()),
		sync: SyncOptions {
			syntax: MarkerSyntax::new(syntax),
			renderer,
			template,
		},
	})
}

fn sync_paths(paths: &[PathBuf], settings: &Settings) -> AnyResult<SyncResult> {
	let files = collect_files(paths, &settings.scan)?;
	let corpus = load_documents(&files)?;
	let result = sync_documents(corpus.into_documents(), &settings.sync)?;

	Ok(result)
}

fn run_update(args: &SnipCli, paths: &[PathBuf], dry_run: bool, watch: bool) -> AnyEmptyResult {
	let settings = load_settings(args)?;
	run_update_once(args, paths, &settings, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	watch_paths(paths, || {
		println!("\nFile change detected, updating...");
		run_update_once(args, paths, &settings, false)
	})
}

fn run_update_once(
	args: &SnipCli,
	paths: &[PathBuf],
	settings: &Settings,
	dry_run: bool,
) -> AnyEmptyResult {
	let result = sync_paths(paths, settings)?;

	if args.verbose {
		println!(
			"Scanned {} file(s): {} definition(s), {} reference(s)",
			result.documents.len(),
			result.definition_count,
			result.reference_count
		);
	}

	if result.is_ok() {
		println!("All reference spans are already up to date.");
		return Ok(());
	}

	if dry_run {
		println!("Dry run: would update {} file(s):", result.changes.len());
		for change in &result.changes {
			println!("  {}", change.file);
		}
		return Ok(());
	}

	write_changes(&result.changes)?;
	println!("Updated {} file(s).", result.changes.len());

	if args.verbose {
		for change in &result.changes {
			println!("  {}", change.file);
		}
	}

	Ok(())
}

/// Run `on_change` whenever a file below `paths` is created or modified,
/// until the process is interrupted. Errors are printed, not returned.
fn watch_paths(paths: &[PathBuf], mut on_change: impl FnMut() -> AnyEmptyResult) -> AnyEmptyResult {
	use notify::Watcher;

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let (tx, rx) = mpsc::channel();
	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	for path in paths {
		watcher.watch(path, notify::RecursiveMode::Recursive)?;
	}

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		if let Err(e) = on_change() {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_check(args: &SnipCli, paths: &[PathBuf], show_diff: bool, format: OutputFormat) -> AnyEmptyResult {
	let settings = load_settings(args)?;
	let result = sync_paths(paths, &settings)?;

	if result.is_ok() {
		match format {
			OutputFormat::Json => println!("{{\"ok\":true,\"stale\":[]}}"),
			OutputFormat::Text => println!("Check passed: all reference spans are up to date."),
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let stale: Vec<serde_json::Value> = result
				.changes
				.iter()
				.map(|change| {
					serde_json::json!({
						"file": change.file,
						"current": change.original,
						"expected": change.updated,
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"stale": stale,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Stale files:");
			for change in &result.changes {
				eprintln!("  {}", change.file);
				if show_diff {
					print_diff(&change.original, &change.updated);
				}
			}
			eprintln!();
			eprintln!(
				"{} file(s) are out of date. Run `snipsync update` to fix.",
				result.changes.len()
			);
		}
	}

	process::exit(1);
}

fn run_list(args: &SnipCli, paths: &[PathBuf]) -> AnyEmptyResult {
	let settings = load_settings(args)?;
	let files = collect_files(paths, &settings.scan)?;
	let corpus = load_documents(&files)?;
	let documents = parse_documents(&corpus, &settings.sync.syntax);

	let mut definitions = 0;
	let mut references = 0;
	for document in &documents {
		let starts: Vec<_> = document
			.markers()
			.filter(|(_, marker)| marker.is_start())
			.collect();
		if starts.is_empty() {
			continue;
		}

		println!("{}", colored!(document.file, bold));
		for (line, marker) in starts {
			if marker.is_reference() {
				references += 1;
			} else {
				definitions += 1;
			}
			println!(
				"  {}[{}] line {}",
				marker.kind,
				marker.id,
				line.display_number()
			);
		}
	}

	if definitions == 0 && references == 0 {
		println!("No snippet markers found.");
		return Ok(());
	}

	println!("\n{definitions} definition(s), {references} reference(s)");

	Ok(())
}

fn run_templates(args: &SnipCli) -> AnyEmptyResult {
	let settings = load_settings(args)?;

	if !settings.sync.template.is_empty() {
		println!(
			"{} {}",
			colored!("Override:", bold),
			escape_newlines(&expand_newlines(&settings.sync.template))
		);
		println!();
	}

	println!("{}", colored!("Default templates:", bold));
	for default in settings.sync.renderer.defaults() {
		println!(
			"  {:<16} {}",
			default.extensions.join(", "),
			escape_newlines(&expand_newlines(&default.template))
		);
	}

	println!();
	println!("{}", colored!("Available variables:", bold));
	print!("{TEMPLATE_HELP}");

	Ok(())
}

fn escape_newlines(template: &str) -> String {
	template.replace('\n', "\\n")
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
