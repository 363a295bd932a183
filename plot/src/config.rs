use align::PlotSpec;
use plotters::style::RGBColor;

const NUM_AGENTS: f64 = 8.0;
const EPISODE_DURATION_SEC: f64 = 16.0;
const COLLISION_WINDOW_SEC: f64 = 60.0;

/// Converts raw per-episode collision counts into collisions per drone per
/// minute; times two because one collision involves two drones.
const COLLISIONS_SCALE: f64 = (COLLISION_WINDOW_SEC / EPISODE_DURATION_SEC) / NUM_AGENTS * 2.0;

pub const OUTPUT_FILE: &str = "final_plots/compare_arch.svg";
pub const CACHE_DIR: &str = "cache";
pub const REPORT_DIR: &str = "final_plots";

/// Group colors, assigned by sorted group index.
pub const PALETTE: [RGBColor; 4] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd7, 0x00, 0x00),
];

/// The metric panels of the comparison figure, in layout order.
pub fn plots() -> Vec<PlotSpec> {
    vec![
        PlotSpec::new("0_aux/avg_rewraw_pos", "Avg. distance to the target")
            .label("Avg. distance, meters")
            .coeff(-1.0 / EPISODE_DURATION_SEC)
            .logscale()
            .clip_min(0.2),
        PlotSpec::new(
            "0_aux/avg_num_collisions_Scenario_ep_rand_bezier",
            "Avg. collisions for pursuit evasion (bezier)",
        )
        .label("Number of collisions")
        .coeff(COLLISIONS_SCALE)
        .logscale()
        .clip_min(0.05),
        PlotSpec::new(
            "0_aux/avg_num_collisions_after_settle",
            "Avg. collisions between drones per minute",
        )
        .label("Number of collisions")
        .coeff(COLLISIONS_SCALE)
        .logscale()
        .clip_min(0.05),
        PlotSpec::new(
            "0_aux/avg_num_collisions_Scenario_static_same_goal",
            "Avg. collisions for static same goal",
        )
        .label("Number of collisions")
        .coeff(COLLISIONS_SCALE)
        .logscale()
        .clip_min(0.05),
    ]
}
