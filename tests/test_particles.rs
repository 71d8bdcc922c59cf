use std::collections::VecDeque;

use side_scroller::entities::*;
use side_scroller::lifecycle::{Lifecycle, TickContext};
use side_scroller::particles::{self, DECAY, MESSAGE_LIFETIME, MIN_SIZE};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn ctx(world_speed: f64) -> TickContext {
    TickContext {
        delta_ms: 16.0,
        world_speed,
        world_height: 500.0,
        ground_margin: 80.0,
    }
}

fn still_dust(x: f64) -> Particle {
    Particle {
        kind: ParticleKind::Dust,
        x,
        y: 0.0,
        size: 10.0,
        speed_x: 0.0,
        speed_y: 0.0,
        marked_for_deletion: false,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Shared motion ────────────────────────────────────────────────────────────

#[test]
fn size_decays_geometrically() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut p = Particle::dust(100.0, 100.0, &mut rng);
    let start = p.size;
    for _ in 0..10 {
        p.update(&ctx(0.0));
    }
    assert!(approx(p.size, start * DECAY.powi(10)));
}

#[test]
fn particle_is_marked_on_the_first_tick_below_min_size() {
    let mut p = still_dust(0.0);
    let mut ticks = 0;
    while !p.marked_for_deletion() {
        let before = p.size;
        p.update(&ctx(0.0));
        ticks += 1;
        if p.marked_for_deletion() {
            assert!(before >= MIN_SIZE);
        }
        assert!(ticks < 1000, "particle never finished");
    }
    assert!(p.size < MIN_SIZE);
    // 10 * 0.97^n < 0.5 first holds at n = 99
    assert_eq!(ticks, 99);
}

#[test]
fn dust_drifts_against_world_scroll() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut p = Particle::dust(200.0, 300.0, &mut rng);
    let (sx, sy) = (p.speed_x, p.speed_y);
    assert!((0.0..1.0).contains(&sx));
    assert!((10.0..20.0).contains(&p.size));
    p.update(&ctx(4.0));
    assert!(approx(p.x, 200.0 - sx - 4.0));
    assert!(approx(p.y, 300.0 - sy));
}

// ── Fire ─────────────────────────────────────────────────────────────────────

#[test]
fn fire_wobbles_with_its_angle() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut p = Particle::fire(200.0, 300.0, &mut rng);
    let va = match p.kind {
        ParticleKind::Fire { va, angle } => {
            assert_eq!(angle, 0.0);
            assert!((-0.1..0.1).contains(&va));
            va
        }
        _ => panic!("expected fire"),
    };
    assert!((50.0..150.0).contains(&p.size));

    p.update(&ctx(8.0));
    assert!(approx(p.x, 200.0 - 1.0 - 8.0 + (va * 5.0).sin()));
    assert!(approx(p.y, 299.0));
    assert_eq!(p.kind, ParticleKind::Fire { angle: va, va });
}

// ── Splash ───────────────────────────────────────────────────────────────────

#[test]
fn splash_is_offset_from_its_origin() {
    let mut rng = StdRng::seed_from_u64(3);
    let p = Particle::splash(500.0, 400.0, &mut rng);
    assert!((100.0..200.0).contains(&p.size));
    assert!(approx(p.x, 500.0 - p.size * 0.4));
    assert!(approx(p.y, 400.0 - p.size * 0.5));
    assert!((-4.0..2.0).contains(&p.speed_x));
    assert!((2.0..4.0).contains(&p.speed_y));
}

#[test]
fn splash_accelerates_downward() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut p = Particle::splash(500.0, 400.0, &mut rng);
    let (y0, sy) = (p.y, p.speed_y);
    p.update(&ctx(0.0));
    assert!(approx(p.y, y0 - sy + 0.1));
    p.update(&ctx(0.0));
    assert!(approx(p.y, y0 - 2.0 * sy + 0.1 + 0.2));
    match p.kind {
        ParticleKind::Splash { gravity } => assert!(approx(gravity, 0.2)),
        _ => panic!("expected splash"),
    }
}

// ── Collection cap ───────────────────────────────────────────────────────────

#[test]
fn spawn_puts_newest_in_front() {
    let mut ps = VecDeque::new();
    particles::spawn(&mut ps, still_dust(1.0));
    particles::spawn(&mut ps, still_dust(2.0));
    assert_eq!(ps.front().map(|p| p.x), Some(2.0));
}

#[test]
fn cap_keeps_the_newest_particles() {
    let mut ps = VecDeque::new();
    for i in 0..60 {
        particles::spawn(&mut ps, still_dust(i as f64));
    }
    particles::update_all(&mut ps, &ctx(0.0), 50);
    assert_eq!(ps.len(), 50);
    assert_eq!(ps.front().map(|p| p.x), Some(59.0));
    assert_eq!(ps.back().map(|p| p.x), Some(10.0));
}

#[test]
fn cap_below_len_does_not_touch_short_collections() {
    let mut ps = VecDeque::new();
    particles::spawn(&mut ps, still_dust(0.0));
    particles::update_all(&mut ps, &ctx(0.0), 50);
    assert_eq!(ps.len(), 1);
}

// ── Collision animation ──────────────────────────────────────────────────────

#[test]
fn collision_animation_is_centred_on_the_contact() {
    let mut rng = StdRng::seed_from_u64(42);
    let c = CollisionAnimation::new(300.0, 200.0, &mut rng);
    assert!(approx(c.x + c.width * 0.5, 300.0));
    assert!(approx(c.y + c.height * 0.5, 200.0));
    assert!(c.width >= 50.0 && c.width < 100.0);
    assert!(approx(c.height / c.width, 0.9));
}

#[test]
fn collision_animation_ends_after_its_last_frame() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut c = CollisionAnimation::new(300.0, 200.0, &mut rng);
    // A 1 s delta passes any interval: frames step every other tick
    let slow = TickContext {
        delta_ms: 1000.0,
        ..ctx(0.0)
    };
    for _ in 0..9 {
        c.update(&slow);
    }
    assert_eq!(c.anim.frame_x, 4);
    assert!(!c.marked_for_deletion());
    c.update(&slow);
    assert_eq!(c.anim.frame_x, 5);
    assert!(c.marked_for_deletion());
}

#[test]
fn collision_animation_scrolls_with_the_world() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut c = CollisionAnimation::new(300.0, 200.0, &mut rng);
    let x0 = c.x;
    c.update(&ctx(8.0));
    assert!(approx(c.x, x0 - 8.0));
}

// ── Floating messages ────────────────────────────────────────────────────────

#[test]
fn message_eases_toward_its_target() {
    let mut m = FloatingMessage::new("+1", 0.0, 200.0, 100.0, 0.0);
    m.update(&ctx(0.0));
    assert!(approx(m.x, 3.0));
    assert!(approx(m.y, 194.0));
    m.update(&ctx(0.0));
    assert!(approx(m.x, 3.0 + 97.0 * 0.03));
}

#[test]
fn message_expires_after_its_lifetime() {
    let mut m = FloatingMessage::new("+1", 0.0, 0.0, 150.0, 50.0);
    for _ in 0..MESSAGE_LIFETIME {
        m.update(&ctx(0.0));
    }
    assert!(!m.marked_for_deletion());
    m.update(&ctx(0.0));
    assert!(m.marked_for_deletion());
}
