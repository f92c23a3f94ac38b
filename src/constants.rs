pub const WINDOW_WIDTH: i32 = 1280;           // Window width in pixels
pub const WINDOW_HEIGHT: i32 = 800;           // Window height in pixels
pub const FPS: u32 = 60;                      // Frames per second

pub const ROTATION_PER_PIXEL: f32 = 0.1;      // Degrees of card tilt per pixel of horizontal drag
pub const FALL_RIGHT_THRESHOLD: f32 = 150.0;  // Horizontal offset beyond which a released card falls right
pub const FALL_DURATION: f32 = 2.0;           // Seconds before a falling card is removed

pub const FALL_DRIFT: f32 = 900.0;            // Horizontal pixels a falling card drifts over the full fall
pub const FALL_DROP: f32 = 1400.0;            // Vertical pixels a falling card drops over the full fall
pub const FALL_SPIN: f32 = 180.0;             // Degrees a falling card spins over the full fall

pub const CARD_MAX_FRACTION: f32 = 0.6;       // Largest fraction of the window a card may cover
