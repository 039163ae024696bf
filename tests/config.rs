use valuenet::config::{load_json, save_json, SelfPlayConfig, TrainConfig};
use valuenet::pgn::PgnFilter;
use valuenet::search::LeafEval;
use pretty_assertions::assert_eq;
use std::fs::create_dir_all;
use std::path::PathBuf;

fn out(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/test_out/config");
    create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn defaults_match_training_setup() {
    let t = TrainConfig::default();
    assert_eq!((t.lr, t.epochs, t.patience, t.batch_size, t.split_seed), (0.001, 10, 10, 1, 42));
    let p = TrainConfig::pgn();
    assert_eq!((p.lr, p.epochs), (0.0001, 100));
    let s = SelfPlayConfig::default();
    assert_eq!(s.batch_threshold, 1000);
    assert_eq!(s.params.search_depth, 1);
    assert_eq!(s.params.leaf_eval, LeafEval::Zero);
    assert!((s.params.search_probability - 1.0 / 6.0).abs() < 1e-12);
    assert_eq!(PgnFilter::default().min_elo, 1700);
}

#[test]
fn partial_json_fills_defaults() {
    let path = out("partial.json");
    std::fs::write(&path, r#"{ "batch_threshold": 50, "params": { "leaf_eval": "network", "search_depth": 2 } }"#).unwrap();
    let cfg: SelfPlayConfig = load_json(&path).unwrap();
    assert_eq!(cfg.batch_threshold, 50);
    assert_eq!(cfg.params.leaf_eval, LeafEval::Network);
    assert_eq!(cfg.params.search_depth, 2);
    assert_eq!(cfg.params.seed, 22);
    assert_eq!(cfg.train, TrainConfig::default());
}

#[test]
fn saved_config_loads_back() {
    let path = out("full.json");
    let mut cfg = SelfPlayConfig::default();
    cfg.max_cycles = Some(3);
    cfg.start_fen = Some("k7/8/8/8/8/8/8/KQ6 w - - 0 1".into());
    save_json(&cfg, &path).unwrap();
    let back: SelfPlayConfig = load_json(&path).unwrap();
    assert_eq!(back, cfg);

    let fpath = out("filter.json");
    let filter = PgnFilter { events: vec!["Rapid".into()], ..Default::default() };
    save_json(&filter, &fpath).unwrap();
    assert_eq!(load_json::<PgnFilter, _>(&fpath).unwrap(), filter);
}

#[test]
fn bad_json_is_an_error() {
    let path = out("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_json::<TrainConfig, _>(&path).is_err());
    assert!(load_json::<TrainConfig, _>(out("missing.json")).is_err());
}
