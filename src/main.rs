use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::io;
use wordle_clone::cache::CacheFiller;
use wordle_clone::cli::{CliInterface, parse_cli};
use wordle_clone::config::GameConfig;
use wordle_clone::game_loop;
use wordle_clone::logging::init_logging;
use wordle_clone::tui::TuiInterface;

fn main() -> Result<()> {
    let cli = parse_cli();
    let full_screen = !cli.simple && !cli.prune_cache;
    init_logging(cli.verbose, cli.log_file.as_deref(), full_screen)
        .context("failed to open the log file")?;

    let config = GameConfig::from_cli(&cli);
    info!("starting with {config:?}");
    let collaborators = config
        .collaborators()
        .context("failed to set up the word services")?;

    if cli.prune_cache {
        let Some(cache) = config.cache() else {
            bail!("the word cache is disabled");
        };
        let removed = cache
            .prune(collaborators.dictionary.as_ref())
            .with_context(|| format!("failed to prune {}", cache.path().display()))?;
        println!(
            "Removed {} entries from {}",
            removed.len(),
            cache.path().display()
        );
        return Ok(());
    }

    let selector = config.selector(&collaborators);

    let filler = config.cache().map(|cache| {
        CacheFiller::spawn(
            cache,
            collaborators.source.clone(),
            collaborators.dictionary.clone(),
            config.fill,
        )
    });

    let result = if cli.simple {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&selector, &mut interface)
    } else {
        let mut interface = TuiInterface::new().context("failed to set up the terminal")?;
        game_loop(&selector, &mut interface)
    };

    // The filler checks its stop flag between batches; a request in flight is abandoned.
    if let Some(filler) = filler {
        filler.request_stop();
    }

    match result {
        Ok(summary) => {
            info!("{} won, {} lost", summary.won, summary.lost);
            Ok(())
        }
        Err(e) => {
            warn!("game ended with an error: {e}");
            Err(e).context("could not start a game")
        }
    }
}
