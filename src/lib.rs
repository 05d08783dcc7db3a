use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, HtmlCanvasElement};

pub mod animation;
pub mod config;
pub mod error;
pub mod generation;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;

pub use animation::TreeMode;
pub use config::TreeConfig;
pub use error::ConfigError;
pub use scene::TreeScene;

use animation::FrameClock;
use render::RenderPipeline;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    console_log::init_with_level(log::Level::Info).ok();
}

/// Christmas tree state exposed to JavaScript
#[wasm_bindgen]
pub struct ChristmasTree {
    pipeline: RenderPipeline,
    scene: TreeScene,
    clock: FrameClock,
    width: i32,
    height: i32,
}

#[wasm_bindgen]
impl ChristmasTree {
    /// Create a tree with the default configuration and a fresh seed
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ChristmasTree, JsValue> {
        Self::build(canvas, TreeConfig::default(), None)
    }

    /// Create a tree from a YAML configuration. Missing keys take defaults.
    #[wasm_bindgen]
    pub fn from_yaml(canvas: HtmlCanvasElement, yaml: &str, seed: Option<u32>) -> Result<ChristmasTree, JsValue> {
        let config = TreeConfig::from_yaml(yaml)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(canvas, config, seed.map(u64::from))
    }

    fn build(canvas: HtmlCanvasElement, config: TreeConfig, seed: Option<u64>) -> Result<ChristmasTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let scene = TreeScene::new(config, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut pipeline = RenderPipeline::new(gl, width, height)
            .map_err(|e| JsValue::from_str(&e))?;
        pipeline.upload_scene(&scene)
            .map_err(|e| JsValue::from_str(&e))?;

        Ok(Self {
            pipeline,
            scene,
            clock: FrameClock::new(),
            width,
            height,
        })
    }

    /// Set the target formation. Returns false if it was already the target.
    #[wasm_bindgen]
    pub fn set_mode(&mut self, mode: TreeMode) -> bool {
        self.scene.set_mode(mode)
    }

    /// Flip between tree and scattered; returns the new target
    #[wasm_bindgen]
    pub fn toggle(&mut self) -> TreeMode {
        self.scene.toggle()
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> TreeMode {
        self.scene.mode()
    }

    /// Morph progress, 0 scattered to 1 assembled
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f32 {
        self.scene.progress()
    }

    #[wasm_bindgen(getter)]
    pub fn seed(&self) -> f64 {
        self.scene.seed() as f64
    }

    /// Update and render a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        let ctx = self.clock.tick(dt);
        let frame = self.scene.update(&ctx);
        self.pipeline.render(&frame);
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.pipeline.resize(width, height);
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> i32 {
        self.height
    }
}
