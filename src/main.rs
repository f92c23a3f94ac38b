use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::{info, warn};

mod audio;
mod constants;
mod deck;
mod fall;
mod gesture;
mod presentation;
mod registry;
mod state;
mod texture_loader;

use crate::audio::{AudioError, AudioSink};
use crate::constants::*;
use crate::presentation::Presentation;
use crate::registry::SlidePayload;
use crate::state::Backdrop;
use crate::texture_loader::load_slide_texture;

#[derive(Parser)]
#[command(name = "swipedeck", about = "Drag-to-dismiss slide deck presentation")]
struct Args {
    /// Directory containing slide<N> image files
    slides_dir: PathBuf,

    /// Looped soundtrack, started once the deck begins to move
    #[arg(long, default_value = "assets/soundtrack.mp3")]
    music: PathBuf,

    /// Backdrop shown while slides remain
    #[arg(long, default_value = "assets/backdrop.png")]
    backdrop: PathBuf,

    /// Backdrop shown once the deck is exhausted
    #[arg(long, default_value = "assets/backdrop_done.png")]
    backdrop_done: PathBuf,

    /// Start with the soundtrack muted
    #[arg(long)]
    muted: bool,
}

/// Soundtrack sink backed by a raylib music stream. Without a stream (no
/// audio device, missing file) playback is reported as denied and the
/// presentation carries on silently.
struct MusicSink<'m> {
    music: Option<&'m Music<'m>>,
}

impl AudioSink for MusicSink<'_> {
    fn play_looped(&mut self) -> std::result::Result<(), AudioError> {
        match self.music {
            Some(music) => {
                music.play_stream();
                Ok(())
            }
            None => Err(AudioError::PlaybackDenied {
                reason: String::from("no audio device or soundtrack available"),
            }),
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(music) = self.music {
            music.set_volume(if muted { 0.0 } else { 1.0 });
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // --- Load Slide Deck ---
    let deck = registry::load(&args.slides_dir)
        .with_context(|| format!("loading slide deck from {:?}", args.slides_dir))?;
    info!("deck ready: {} slides", deck.real_count());

    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("Swipe Deck")
        .vsync()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load Textures ---
    let mut textures: Vec<Option<Texture2D>> = Vec::new();
    for payload in deck.slides() {
        match payload {
            SlidePayload::Content { path, .. } => {
                match load_slide_texture(&mut rl, &thread, path) {
                    Ok(texture) => textures.push(Some(texture)),
                    Err(e) => {
                        warn!("{e:#}; drawing a placeholder card instead");
                        textures.push(None);
                    }
                }
            }
            SlidePayload::Blank => textures.push(None),
        }
    }

    let intro_backdrop = load_backdrop(&mut rl, &thread, &args.backdrop);
    let finished_backdrop = load_backdrop(&mut rl, &thread, &args.backdrop_done);

    // --- Audio ---
    let audio = match RaylibAudio::init_audio_device() {
        Ok(audio) => Some(audio),
        Err(e) => {
            warn!("audio device unavailable: {e}");
            None
        }
    };
    let mut music = audio.as_ref().and_then(|audio| {
        match audio.new_music(&args.music.to_string_lossy()) {
            Ok(music) => Some(music),
            Err(e) => {
                warn!("could not load soundtrack {:?}: {e}", args.music);
                None
            }
        }
    });
    if let Some(music) = music.as_mut() {
        music.looping = true;
    }
    let music = music;

    let sink = MusicSink {
        music: music.as_ref(),
    };
    let mut presentation = Presentation::new(deck.len(), sink, args.muted);

    let window_center = Vector2::new(WINDOW_WIDTH as f32 / 2.0, WINDOW_HEIGHT as f32 / 2.0);
    let mut drag_origin: Option<Vector2> = None;

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        // 1. Keyboard actions
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            presentation.reset();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_M) {
            presentation.toggle_mute();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) || rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            presentation.advance();
        }

        // 2. Drag input. The drag is clamped so the card center stays
        //    inside the window.
        let mouse = rl.get_mouse_position();
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) && drag_origin.is_none() {
            if let Some(index) = presentation.visible_slide() {
                let card = card_rect(textures[index].as_ref(), window_center);
                if card.check_collision_point_rec(mouse) {
                    drag_origin = Some(mouse);
                    presentation.on_drag_start();
                }
            }
        }
        if let Some(origin) = drag_origin {
            let (dx, dy) = clamp_drag(mouse.x - origin.x, mouse.y - origin.y, window_center);
            if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
                presentation.on_drag_end(dx, dy);
                drag_origin = None;
            } else {
                presentation.on_drag_move(dx, dy);
            }
        }

        // 3. Timers and audio streaming
        presentation.update(dt);
        if presentation.is_playing() {
            if let Some(music) = music.as_ref() {
                music.update_stream();
            }
        }

        // --- Draw ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::RAYWHITE);

        let backdrop = match presentation.backdrop() {
            Backdrop::Intro => intro_backdrop.as_ref(),
            Backdrop::Finished => finished_backdrop.as_ref(),
        };
        if let Some(texture) = backdrop {
            d.draw_texture_pro(
                texture,
                Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                Rectangle::new(0.0, 0.0, WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32),
                Vector2::zero(),
                0.0,
                Color::WHITE,
            );
        }

        // Lookahead card first, then the draggable card on top of it.
        if let Some(index) = presentation.next_up() {
            draw_card(&mut d, textures[index].as_ref(), window_center, 0.0);
        }
        if let Some(index) = presentation.visible_slide() {
            let offset = presentation.gesture_position();
            let center = Vector2::new(window_center.x + offset.x, window_center.y + offset.y);
            draw_card(
                &mut d,
                textures[index].as_ref(),
                center,
                presentation.gesture_rotation(),
            );
        }

        // Falling card overlay, departing from where it was released.
        if let Some(falling) = presentation.falling() {
            let transform = falling.transform();
            let center = Vector2::new(
                window_center.x + transform.translate_x,
                window_center.y + transform.translate_y,
            );
            draw_card(
                &mut d,
                textures[falling.slide_index].as_ref(),
                center,
                transform.rotate_deg,
            );
        }

        let hint = format!(
            "R reset   M mute   SPACE next   [{}]",
            if presentation.is_muted() { "muted" } else { "sound on" }
        );
        d.draw_text(&hint, 20, WINDOW_HEIGHT - 40, 20, Color::DARKGRAY);
    }

    Ok(())
}

fn load_backdrop(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    path: &Path,
) -> Option<Texture2D> {
    match load_slide_texture(rl, thread, path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("{e:#}; using a plain background");
            None
        }
    }
}

/// Scale a card texture to fit within the card area of the window.
fn card_scale(width: f32, height: f32) -> f32 {
    let max_w = WINDOW_WIDTH as f32 * CARD_MAX_FRACTION;
    let max_h = WINDOW_HEIGHT as f32 * CARD_MAX_FRACTION;
    (max_w / width).min(max_h / height).min(1.0)
}

fn card_rect(texture: Option<&Texture2D>, center: Vector2) -> Rectangle {
    let (w, h) = match texture {
        Some(texture) => {
            let scale = card_scale(texture.width() as f32, texture.height() as f32);
            (texture.width() as f32 * scale, texture.height() as f32 * scale)
        }
        None => (480.0, 320.0),
    };
    Rectangle::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
}

/// Keep the dragged card's center inside the window (the parent bounds).
fn clamp_drag(dx: f32, dy: f32, window_center: Vector2) -> (f32, f32) {
    (
        dx.clamp(-window_center.x, window_center.x),
        dy.clamp(-window_center.y, window_center.y),
    )
}

fn draw_card(
    d: &mut RaylibDrawHandle,
    texture: Option<&Texture2D>,
    center: Vector2,
    rotation: f32,
) {
    match texture {
        Some(texture) => {
            let tex_w = texture.width() as f32;
            let tex_h = texture.height() as f32;
            let scale = card_scale(tex_w, tex_h);
            let w = tex_w * scale;
            let h = tex_h * scale;
            d.draw_texture_pro(
                texture,
                Rectangle::new(0.0, 0.0, tex_w, tex_h),
                // The destination position anchors the origin point, so the
                // card rotates around its center.
                Rectangle::new(center.x, center.y, w, h),
                Vector2::new(w / 2.0, h / 2.0),
                rotation,
                Color::WHITE,
            );
        }
        None => {
            d.draw_rectangle_pro(
                Rectangle::new(center.x, center.y, 480.0, 320.0),
                Vector2::new(240.0, 160.0),
                rotation,
                Color::LIGHTGRAY,
            );
        }
    }
}
