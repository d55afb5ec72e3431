use super::*;

#[test]
fn parses_stores_command() {
    let cli = Cli::try_parse_from(["winestock", "stores"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Stores));
}

#[test]
fn parses_categories_command() {
    let cli = Cli::try_parse_from(["winestock", "categories"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Categories));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["winestock"]).is_err());
}

#[test]
fn collect_without_flags_changes_nothing() {
    let cli = Cli::try_parse_from(["winestock", "collect"]).unwrap();
    let Commands::Collect(args) = cli.command else {
        panic!("expected collect command");
    };
    assert!(args.address.is_none());
    assert!(args.category.is_none());
    assert!(args.output.is_none());

    let mut profile = RunProfile::default();
    args.apply_to(&mut profile);
    assert_eq!(profile, RunProfile::default());
}

#[test]
fn collect_parses_every_flag() {
    let cli = Cli::try_parse_from([
        "winestock",
        "collect",
        "--address",
        "Обнинск, пр-кт. Ленина, дом 137",
        "--category",
        "Крепкие напитки",
        "--include-unavailable",
        "--dump",
        "--skip-failed-products",
        "--output",
        "out/obninsk.csv",
    ])
    .unwrap();

    let Commands::Collect(args) = cli.command else {
        panic!("expected collect command");
    };
    assert_eq!(args.address.as_deref(), Some("Обнинск, пр-кт. Ленина, дом 137"));
    assert_eq!(args.category.as_deref(), Some("Крепкие напитки"));
    assert!(args.include_unavailable);
    assert!(args.dump);
    assert!(args.skip_failed_products);
    assert_eq!(args.output, Some(PathBuf::from("out/obninsk.csv")));
}

#[test]
fn category_conflicts_with_all_categories() {
    let result = Cli::try_parse_from([
        "winestock",
        "collect",
        "--category",
        "Вино",
        "--all-categories",
    ]);
    assert!(result.is_err());
}

#[test]
fn flags_override_profile_fields() {
    let args = CollectArgs {
        address: Some("Москва, ул. Тверская, 1".to_string()),
        category: Some("Вино".to_string()),
        include_unavailable: true,
        dump: true,
        skip_failed_products: true,
        ..CollectArgs::default()
    };
    let mut profile = RunProfile {
        address: Some("Обнинск, пр-кт. Ленина".to_string()),
        ..RunProfile::default()
    };

    args.apply_to(&mut profile);

    assert_eq!(profile.address.as_deref(), Some("Москва, ул. Тверская, 1"));
    assert_eq!(profile.category.as_deref(), Some("Вино"));
    assert!(!profile.available_only);
    assert!(profile.dump_raw_responses);
    assert_eq!(profile.on_product_error, ProductErrorPolicy::Skip);
}

#[test]
fn all_categories_clears_profile_category() {
    let args = CollectArgs {
        all_categories: true,
        ..CollectArgs::default()
    };
    let mut profile = RunProfile {
        category: Some("Крепкие напитки".to_string()),
        ..RunProfile::default()
    };

    args.apply_to(&mut profile);

    assert!(profile.category.is_none());
}

#[test]
fn missing_profile_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("winestock-no-such-profile.yaml");
    let profile = load_run_profile(&path).unwrap();
    assert_eq!(profile, RunProfile::default());
}

#[test]
fn shipped_profile_parses_and_validates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/profile.yaml");
    let profile = load_run_profile(&path).unwrap();
    profile.validate().unwrap();
    let target = profile.store_target().unwrap();
    assert_eq!(target.city, "Обнинск");
    assert_eq!(profile.category.as_deref(), Some("Крепкие напитки"));
}
