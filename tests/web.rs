#![cfg(target_arch = "wasm32")]

use signature_tree::animation::FrameClock;
use signature_tree::{TreeConfig, TreeMode, TreeScene};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn yaml_config_builds_scene() {
    let yaml = r##"
particle_count: 500
palette:
  base: "#0b5d3b"
  accent: "#ffd700"
"##;
    let config = TreeConfig::from_yaml(yaml).unwrap();
    let scene = TreeScene::new(config, Some(9)).unwrap();
    assert_eq!(scene.foliage().len(), 500);
    assert_eq!(scene.progress(), 1.0);
}

#[wasm_bindgen_test]
fn scene_scatters_in_browser() {
    let config = TreeConfig { particle_count: 200, ..Default::default() };
    let mut scene = TreeScene::new(config, None).unwrap();
    scene.set_mode(TreeMode::Scattered);

    let mut clock = FrameClock::new();
    for _ in 0..300 {
        scene.update(&clock.tick(1.0 / 60.0));
    }
    assert!(scene.progress() < 0.01);
}
