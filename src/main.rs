use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use kycdash::{App, AppConfig, AppEvent, Args, ConfigManager};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::mpsc::channel;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn resolve_data_path(args: &Args, config: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = &args.path {
        return Ok(path.clone());
    }
    if let Some(path) = &config.data.path {
        return Ok(path.clone());
    }
    Err(eyre!(
        "No dataset given. Pass a CSV path or set [data] path in config.toml"
    ))
}

fn run(mut terminal: DefaultTerminal, args: &Args) -> Result<()> {
    let config = AppConfig::load(kycdash::APP_NAME)?;
    let path = resolve_data_path(args, &config)?;

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(config);
    if let Some(dir) = &args.export_dir {
        app.set_export_dir(dir.clone());
    }
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Open(path))?;

    loop {
        if crossterm::event::poll(std::time::Duration::from_millis(25))? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(std::time::Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.write_config {
        let config = ConfigManager::new(kycdash::APP_NAME)?;
        match config.write_default_config(args.force) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error writing config: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = run(terminal, &args);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
