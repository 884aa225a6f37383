use macroquad::prelude::*;
use macroquad_tilegrid::render::cull::{cells_extent, visible_cells};
use macroquad_tilegrid::render::{draw_frame, draw_level};
use macroquad_tilegrid::{
    Actor, Direction, GameConfig, Intent, Level, Positioned, SpriteSheet, Trigger, World,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Tile Grid Walk".into(),
        window_width: 960,
        window_height: 640,
        ..Default::default()
    }
}

fn knight_sheet(cfg: &GameConfig) -> SpriteSheet {
    let base = SpriteSheet::new(16, 16).with_ticks_per_frame(cfg.ticks_per_frame);
    ["down", "up", "left", "right"]
        .into_iter()
        .enumerate()
        .try_fold(base, |sheet, (col, key)| {
            let walk = sheet.column_frames(col as u32, 4);
            let swing = sheet.column_frames(col as u32 + 4, 1);
            sheet
                .with_animation(key, walk)?
                .with_animation(format!("attack/{key}"), swing)
        })
        .expect("Knight sheet frames are well formed")
}

fn read_intent() -> Intent {
    let direction = Direction::from_held(
        is_key_down(KeyCode::Right),
        is_key_down(KeyCode::Left),
        is_key_down(KeyCode::Up),
        is_key_down(KeyCode::Down),
    );
    Intent {
        direction,
        attack: is_key_pressed(KeyCode::Enter),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = GameConfig::from_json_file("assets/game.json").unwrap_or_default();
    let level = Level::load("assets/level.tmj", "assets/floor.tsj").expect("Failed to load level");
    let tiles = load_texture(&level.atlas.image.to_string_lossy())
        .await
        .expect("Failed to load tileset image");
    let knight_tex = load_texture("assets/knight.png")
        .await
        .expect("Failed to load knight sprite");
    tiles.set_filter(FilterMode::Nearest);
    knight_tex.set_filter(FilterMode::Nearest);

    let mut world = World::from_config(&cfg, level.pixel_size());
    let knight = world.spawn_actor(
        Actor::new("knight", knight_sheet(&cfg), vec2(32.0, 32.0)).with_speed(cfg.actor_speed),
    );
    world.track(knight);
    world.add_trigger(Trigger::new(
        "event",
        Rect::new(96.0, 64.0, 16.0, 16.0),
        cfg.trigger_cooldown_secs,
    ));

    let mut debug_overlay = false;
    let mut pending = 0.0;

    loop {
        if is_key_pressed(KeyCode::F1) {
            debug_overlay = !debug_overlay;
        }

        let intent = read_intent();
        pending += get_frame_time() as f64;
        while pending >= cfg.tick_seconds() {
            pending -= cfg.tick_seconds();
            world.update(|a| if a.id() == knight { intent } else { Intent::default() });
        }

        clear_background(BLACK);
        set_camera(&Camera2D::from_display_rect(Rect::new(
            0.0,
            0.0,
            cfg.viewport_width,
            cfg.viewport_height,
        )));

        draw_level(&tiles, &level, world.camera());
        for (_, frame) in world.frames() {
            draw_frame(&knight_tex, &frame, world.camera());
        }
        if debug_overlay {
            let view = world.camera().view_rect();
            let (tw, th) = level.tile_size();
            let (min, max) = visible_cells(view.point(), view.point() + view.size(), tw, th);
            let (lo, hi) = cells_extent(min, max, tw, th);
            let size = hi - lo;
            let lo = world.camera().to_screen(lo);
            draw_rectangle_lines(lo.x, lo.y, size.x, size.y, 1.0, YELLOW);
            for (_, r) in world.body_bounds() {
                let p = world.camera().to_screen(r.point());
                draw_rectangle_lines(p.x, p.y, r.w, r.h, 1.0, RED);
            }
        }

        set_default_camera();
        draw_text(&format!("FPS: {}", get_fps()), 8.0, 24.0, 24.0, RED);

        next_frame().await;
    }
}
