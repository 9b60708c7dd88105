use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["vibrance-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["vibrance-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vibrance-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn curate_defaults() {
    let cli = Cli::try_parse_from(["vibrance-cli", "curate"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Curate {
            feed: None,
            threshold: None,
            dry_run: false,
            ..
        })
    ));
}

#[test]
fn curate_with_feed_threshold_and_flags() {
    let cli = Cli::try_parse_from([
        "vibrance-cli",
        "curate",
        "--feed",
        "Mindful.org",
        "--threshold",
        "0.9",
        "--reset",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Curate {
            feed,
            threshold,
            reset,
            dry_run,
        }) => {
            assert_eq!(feed.as_deref(), Some("Mindful.org"));
            assert_eq!(threshold, Some(0.9));
            assert!(reset);
            assert!(dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn curate_rejects_out_of_range_threshold() {
    assert!(Cli::try_parse_from(["vibrance-cli", "curate", "--threshold", "1.5"]).is_err());
    assert!(Cli::try_parse_from(["vibrance-cli", "curate", "--threshold", "abc"]).is_err());
}

#[test]
fn articles_defaults() {
    let cli = Cli::try_parse_from(["vibrance-cli", "articles"]).unwrap();
    match cli.command {
        Some(Commands::Articles {
            min_positivity,
            limit,
        }) => {
            assert!((min_positivity - 0.85).abs() < f64::EPSILON);
            assert_eq!(limit, 20);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_feeds_command() {
    let cli = Cli::try_parse_from(["vibrance-cli", "feeds"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Feeds)));
}
