use clap::Parser;

use gbolt::cli::Cli;

#[test]
fn defaults() {
    let cli = Cli::try_parse_from(["gbolt", "main.cpp"]).unwrap();

    assert_eq!(cli.host, "https://godbolt.org");
    assert!(!cli.list_langs);
    assert_eq!(cli.list_compilers, None);
    assert_eq!(cli.compiler, None);
    assert_eq!(cli.lang, None);
    assert!(!cli.exec);
    assert!(!cli.skip_asm);
    assert!(!cli.compare);
    assert!(!cli.link);
    assert!(!cli.verbose);
    assert_eq!(cli.file.as_ref().unwrap().to_str(), Some("main.cpp"));
}

#[test]
fn list_compilers_value_is_optional() {
    let cli = Cli::try_parse_from(["gbolt", "--list-compilers"]).unwrap();
    assert_eq!(cli.list_compilers, Some(None));

    let cli = Cli::try_parse_from(["gbolt", "--list-compilers", "rust"]).unwrap();
    assert_eq!(cli.list_compilers, Some(Some("rust".into())));
}

#[test]
fn args_and_stdin_collect_multiple_values() {
    let cli = Cli::try_parse_from([
        "gbolt", "-a", "one", "two", "--stdin", "first", "second", "--", "main.cpp",
    ])
    .unwrap();

    assert_eq!(cli.args, vec!["one", "two"]);
    assert_eq!(cli.stdin, vec!["first", "second"]);
    assert_eq!(cli.file.as_ref().unwrap().to_str(), Some("main.cpp"));
}

#[test]
fn extended_flags_parse() {
    let cli = Cli::try_parse_from([
        "gbolt",
        "-H",
        "localhost:10240",
        "-c",
        "g132",
        "-l",
        "c++",
        "--cflags",
        "-O2 -Wall",
        "-e",
        "-s",
        "-C",
        "-L",
        "-v",
        "main.cpp",
    ])
    .unwrap();

    assert_eq!(cli.host, "localhost:10240");
    assert_eq!(cli.compiler.as_deref(), Some("g132"));
    assert_eq!(cli.lang.as_deref(), Some("c++"));
    assert_eq!(cli.cflags.as_deref(), Some("-O2 -Wall"));
    assert!(cli.exec);
    assert!(cli.skip_asm);
    assert!(cli.compare);
    assert!(cli.link);
    assert!(cli.verbose);
}

#[test]
fn input_file_is_not_required_for_listings() {
    let cli = Cli::try_parse_from(["gbolt", "--list-langs"]).unwrap();
    assert!(cli.list_langs);
    assert_eq!(cli.file, None);
}
