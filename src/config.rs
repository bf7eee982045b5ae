use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "quantum-viz", version, about = "Fractal field + audio spectrum core of the quantum fractal visualizer (offline driver)")]
pub struct Config {
    #[arg(long, default_value = "mandelbrot")]
    pub variant: String,

    #[arg(long, default_value_t = 128)]
    pub iterations: u32,

    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    #[arg(long, default_value_t = 0.0)]
    pub offset_x: f64,

    #[arg(long, default_value_t = 0.0)]
    pub offset_y: f64,

    #[arg(long, default_value_t = 0.0)]
    pub phase: f64,

    #[arg(long, default_value_t = 2.0)]
    pub dimension_shift: f64,

    #[arg(long, default_value_t = 1.5)]
    pub chaos_parameter: f64,

    #[arg(long, default_value_t = 96)]
    pub width: usize,

    #[arg(long, default_value_t = 48)]
    pub height: usize,

    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    #[arg(long, default_value = "lorenz")]
    pub attractor: String,

    #[arg(long, default_value_t = 500)]
    pub steps: usize,

    #[arg(long, default_value_t = crate::chaos::DEFAULT_DT)]
    pub dt: f64,

    #[arg(long, default_value_t = 240)]
    pub frames: usize,

    #[arg(long, default_value_t = 256)]
    pub fft_size: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub list_variants: bool,
}
