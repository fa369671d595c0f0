pub mod icons;
pub mod render;

pub use render::{
    priority_marker, render_banner, render_board, render_stamps, render_task_row, short_id,
    status_style,
};
