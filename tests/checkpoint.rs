use valuenet::eval::{checkpoint, Linear, ShapeError, ValueNet, PGN_WIDTHS, SELFPLAY_WIDTHS};
use std::fs::create_dir_all;
use std::path::PathBuf;

fn out(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/test_out/checkpoint");
    create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn architectures_have_expected_shapes() {
    let a = ValueNet::selfplay(0);
    assert_eq!(a.widths(), SELFPLAY_WIDTHS.to_vec());
    assert_eq!(a.param_count(), 769 * 64 + 64 + 64 * 32 + 32 + 32 + 1);
    let b = ValueNet::pgn(0);
    assert_eq!(b.widths(), PGN_WIDTHS.to_vec());
}

#[test]
fn init_is_seeded_and_bounded() {
    assert_eq!(ValueNet::selfplay(5), ValueNet::selfplay(5));
    assert_ne!(ValueNet::selfplay(5), ValueNet::selfplay(6));
    let net = ValueNet::selfplay(5);
    let bound = 1.0 / (769f32).sqrt();
    assert!(net.layers()[0].weights.iter().all(|w| w.abs() <= bound));
}

#[test]
fn save_then_load_restores_network() {
    let net = ValueNet::new(&[769, 8, 1], 11).unwrap();
    let path = out("roundtrip.ckpt");
    checkpoint::save(&net, &path).unwrap();
    assert_eq!(checkpoint::load(&path).unwrap(), net);
}

#[test]
fn load_rejects_garbage_and_missing_files() {
    let path = out("garbage.ckpt");
    std::fs::write(&path, b"definitely not a checkpoint").unwrap();
    assert!(checkpoint::load(&path).is_err());
    assert!(checkpoint::load(out("missing.ckpt")).is_err());

    let net = ValueNet::new(&[769, 2, 1], 1).unwrap();
    let trunc = out("truncated.ckpt");
    checkpoint::save(&net, &trunc).unwrap();
    let bytes = std::fs::read(&trunc).unwrap();
    std::fs::write(&trunc, &bytes[..bytes.len() - 3]).unwrap();
    assert!(checkpoint::load(&trunc).is_err());
}

#[test]
fn from_layers_checks_shapes() {
    assert_eq!(ValueNet::from_layers(vec![]).unwrap_err(), ShapeError::Empty);
    let chain = vec![Linear::zeros(4, 3), Linear::zeros(2, 1)];
    assert_eq!(ValueNet::from_layers(chain).unwrap_err(), ShapeError::Chain { index: 1, expected: 3, found: 2 });
    assert_eq!(ValueNet::from_layers(vec![Linear::zeros(4, 2)]).unwrap_err(), ShapeError::Output(2));
    let mut bad = Linear::zeros(4, 1);
    bad.bias.push(0.0);
    assert!(matches!(ValueNet::from_layers(vec![bad]), Err(ShapeError::Size { what: "bias", .. })));
}

#[test]
fn new_rejects_degenerate_widths() {
    assert_eq!(ValueNet::new(&[769], 0).unwrap_err(), ShapeError::Empty);
    assert_eq!(ValueNet::new(&[], 0).unwrap_err(), ShapeError::Empty);
    assert_eq!(ValueNet::new(&[769, 8, 4], 0).unwrap_err(), ShapeError::Output(4));
    assert!(ValueNet::new(&[769, 8, 1], 0).is_ok());
}

#[test]
fn input_width_must_match_encoder() {
    let narrow = ValueNet::new(&[10, 4, 1], 0).unwrap();
    assert_eq!(narrow.check_features().unwrap_err(), ShapeError::Input { expected: 769, found: 10 });
    assert!(ValueNet::selfplay(0).check_features().is_ok());

    let path = out("narrow.ckpt");
    checkpoint::save(&narrow, &path).unwrap();
    let err = checkpoint::load(&path).unwrap_err();
    assert!(matches!(err.downcast_ref::<ShapeError>(), Some(ShapeError::Input { found: 10, .. })));
}
