//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use automata_sim::cli::commands::execute;
    use automata_sim::cli::paths::validate_config_path;
    use automata_sim::cli::{Cli, Commands, SimulatorConfig};
    use automata_sim::search::{RevisitPolicy, Verdict};

    const NPDA: &str = "\
Q = {q0, q1}
E = {a, b}
T = {Z, A}
Z = Z
I = q0
F = {q1}
d(q0, a, Z) = {(q0, AZ)}
d(q0, a, A) = {(q0, AA)}
d(q0, b, A) = {(q0, ~)}
d(q0, ~, Z) = {(q1, Z)}
";

    const CFG: &str = "V={S}\nT={a,b}\nS=S\nS->aSb|~\n";

    const LOOPING_NPDA: &str = "Q={q0,q1}\nE={a}\nT={Z}\nZ=Z\nI=q0\nF={q1}\nd(q0,~,Z)={(q0,Z)}\n";

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        fn config(&self) -> PathBuf {
            self.dir.path().join("config.json")
        }

        fn run(&self, args: &[&str]) -> anyhow::Result<Option<Verdict>> {
            let config = self.config();
            let mut argv = vec!["automata-sim", "-c", config.to_str().unwrap()];
            argv.extend_from_slice(args);
            execute(Cli::try_parse_from(argv)?)
        }
    }

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from([
            "automata-sim",
            "-vv",
            "npda",
            "machine.txt",
            "-i",
            "aabb",
            "-t",
            "-m",
            "50",
            "-p",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Npda(args) => {
                assert_eq!(args.desc, PathBuf::from("machine.txt"));
                assert_eq!(args.input.as_deref(), Some("aabb"));
                assert!(args.trace);
                assert_eq!(args.max_steps, Some(50));
                assert!(args.prune_revisits);
                assert!(!args.json);
            }
            _ => panic!("expected the npda subcommand"),
        }
    }

    #[test]
    fn test_input_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["automata-sim", "nfa", "m.txt"]).is_err());
        assert!(
            Cli::try_parse_from(["automata-sim", "nfa", "m.txt", "-i", "a", "-d", "in.txt"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["automata-sim", "nfa", "m.txt", "-d", "in.txt"]).is_ok());
    }

    #[test]
    fn test_settings_revisit_spelling() {
        let cli =
            Cli::try_parse_from(["automata-sim", "settings", "--set-revisit", "Prune"]).unwrap();
        match cli.command {
            Commands::Settings { set_revisit, .. } => {
                assert_eq!(set_revisit, Some(RevisitPolicy::Prune))
            }
            _ => panic!("expected the settings subcommand"),
        }
        assert!(
            Cli::try_parse_from(["automata-sim", "settings", "--set-revisit", "sometimes"])
                .is_err()
        );
    }

    #[test]
    fn test_run_verdicts() {
        let ws = Workspace::new();
        let npda = ws.file("balanced.npda", NPDA);
        let cfg = ws.file("balanced.cfg", CFG);
        let npda = npda.to_str().unwrap();
        let cfg = cfg.to_str().unwrap();

        assert_eq!(
            ws.run(&["npda", npda, "-i", "aabb"]).unwrap(),
            Some(Verdict::Accept)
        );
        assert_eq!(
            ws.run(&["npda", npda, "-i", "aab"]).unwrap(),
            Some(Verdict::Reject)
        );
        assert_eq!(
            ws.run(&["cfg", cfg, "-i", "~", "--json"]).unwrap(),
            Some(Verdict::Accept)
        );
    }

    #[test]
    fn test_input_from_data_file() {
        let ws = Workspace::new();
        let npda = ws.file("balanced.npda", NPDA);
        let data = ws.file("input.txt", "a a\nb b  // trailing comment\n");
        assert_eq!(
            ws.run(&[
                "npda",
                npda.to_str().unwrap(),
                "-d",
                data.to_str().unwrap()
            ])
            .unwrap(),
            Some(Verdict::Accept)
        );
    }

    #[test]
    fn test_errors_surface_with_context() {
        let ws = Workspace::new();
        let npda = ws.file("balanced.npda", NPDA);

        let missing = ws.dir.path().join("missing.npda");
        let err = ws
            .run(&["npda", missing.to_str().unwrap(), "-i", "ab"])
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load description"));

        let err = ws
            .run(&["npda", npda.to_str().unwrap(), "-i", "abc"])
            .unwrap_err();
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_stored_budget_applies_to_runs() {
        let ws = Workspace::new();
        let looping = ws.file("loop.npda", LOOPING_NPDA);
        let looping = looping.to_str().unwrap();

        assert_eq!(
            ws.run(&["settings", "--set-max-steps", "25"]).unwrap(),
            None
        );
        let err = ws.run(&["npda", looping, "-i", "a"]).unwrap_err();
        assert!(err.to_string().contains("25"));

        // The command-line flag takes over from the stored default.
        assert_eq!(
            ws.run(&["npda", looping, "-i", "a", "-p"]).unwrap(),
            Some(Verdict::Reject)
        );
    }

    #[test]
    fn test_settings_round_trip() {
        let ws = Workspace::new();
        ws.run(&[
            "settings",
            "--set-max-steps",
            "500",
            "--set-revisit",
            "prune",
            "--set-trace",
            "true",
        ])
        .unwrap();

        let stored = SimulatorConfig::load_from(Some(&ws.config())).unwrap();
        assert_eq!(stored.max_steps, Some(500));
        assert_eq!(stored.revisit, Some(RevisitPolicy::Prune));
        assert!(stored.trace_enabled());

        ws.run(&["settings", "--clear-max-steps"]).unwrap();
        let stored = SimulatorConfig::load_from(Some(&ws.config())).unwrap();
        assert_eq!(stored.max_steps, None);
        assert_eq!(stored.revisit, Some(RevisitPolicy::Prune));

        ws.run(&["settings", "--reset"]).unwrap();
        assert_eq!(
            SimulatorConfig::load_from(Some(&ws.config())).unwrap(),
            SimulatorConfig::default()
        );
    }

    #[test]
    fn test_config_must_be_json() {
        let ws = Workspace::new();
        let npda = ws.file("balanced.npda", NPDA);
        let toml = ws.dir.path().join("config.toml");
        assert!(validate_config_path(&toml).is_err());

        let cli = Cli::try_parse_from([
            "automata-sim",
            "-c",
            toml.to_str().unwrap(),
            "npda",
            npda.to_str().unwrap(),
            "-i",
            "ab",
        ])
        .unwrap();
        assert!(execute(cli).is_err());
    }
}
