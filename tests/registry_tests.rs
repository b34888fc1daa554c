//! Integration tests for LightRegistry

mod common;
use common::*;

use buoy_sequencer::{
    Characteristic, LightRegistry, LightState, LightTimer, NoJitter, PixelId, RegistryError,
    Srgb,
};

type Registry = LightRegistry<'static, TestInstant, 16, 10>;

fn light(name: &'static str, pixel: usize, color: Srgb, durations: &[TestDuration]) -> LightTimer<'static, TestInstant, 16> {
    LightTimer::builder(name, PixelId(pixel))
        .color(color)
        .sequence(durations)
        .build()
        .unwrap()
}

#[test]
fn polls_in_registration_order_with_shared_now() {
    let mut registry = Registry::new();
    registry.register(light("north3", 7, GREEN, &[ms(500), ms(1500)])).unwrap();
    registry.register(light("north1", 5, GREEN, &[ms(500), ms(1500)])).unwrap();
    registry.register(light("north2", 6, GREEN, &[ms(500), ms(1500)])).unwrap();
    registry.arm_all(at_ms(0), &mut NoJitter);

    let mut output = MockOutput::new();
    let mut seen = heapless::Vec::<(&str, TestInstant), 4>::new();
    let fired = registry.poll_all_once_with(at_ms(1), &mut NoJitter, &mut output, |timer, transition| {
        seen.push((timer.name(), transition.fired_at)).unwrap();
    });

    assert_eq!(fired, 3);
    assert_eq!(
        seen.as_slice(),
        &[("north3", at_ms(1)), ("north1", at_ms(1)), ("north2", at_ms(1))]
    );
    let pixels: heapless::Vec<usize, 4> = output.history().iter().map(|(p, _)| p.0).collect();
    assert_eq!(pixels.as_slice(), &[7, 5, 6]);
}

#[test]
fn staggered_delays_fire_in_sequence() {
    let mut registry = Registry::new();
    for (index, delay) in [0u64, 300, 600].into_iter().enumerate() {
        let timer = LightTimer::builder("north", PixelId(5 + index))
            .color(GREEN)
            .sequence(&[ms(500), ms(1500)])
            .initial_delay(ms(delay))
            .build()
            .unwrap();
        registry.register(timer).unwrap();
    }
    registry.arm_all(at_ms(100), &mut NoJitter);

    let mut output = MockOutput::new();
    assert_eq!(registry.poll_all_once(at_ms(101), &mut NoJitter, &mut output), 1);
    assert_eq!(registry.poll_all_once(at_ms(401), &mut NoJitter, &mut output), 1);
    assert_eq!(registry.poll_all_once(at_ms(701), &mut NoJitter, &mut output), 2);

    // The first light went off on this pass and the third came on
    assert_eq!(registry.get(0).unwrap().state(), LightState::Off);
    assert_eq!(registry.get(1).unwrap().state(), LightState::On);
    assert_eq!(registry.get(2).unwrap().state(), LightState::On);
}

#[test]
fn unarmed_registry_fires_on_first_poll() {
    let mut registry = Registry::new();
    registry.register(light("early", 0, RED, &[ms(500), ms(2000)])).unwrap();

    let mut output = MockOutput::new();
    assert_eq!(registry.poll_all_once(at_ms(0), &mut NoJitter, &mut output), 1);
    assert_eq!(output.last_for(PixelId(0)), Some(RED));
}

#[test]
fn full_registry_rejects_more_timers() {
    let mut registry = LightRegistry::<'static, TestInstant, 16, 2>::new();
    registry.register(light("a", 0, RED, &[ms(1)])).unwrap();
    registry.register(light("b", 1, RED, &[ms(1)])).unwrap();

    let result = registry.register(light("c", 2, RED, &[ms(1)]));
    assert_eq!(result, Err(RegistryError::Full { capacity: 2 }));
    assert_eq!(registry.len(), 2);
}

#[test]
fn sector_light_from_characteristic_stays_in_lockstep() {
    let dunollie = Characteristic::parse("Fl(2) WRG 6s").unwrap();
    let mut registry = Registry::new();

    for (index, colour) in dunollie.colours().iter().enumerate() {
        let timer = LightTimer::builder("Dunollie", PixelId(2 + index))
            .color(colour.srgb())
            .flash_sequence(dunollie.to_sequence().unwrap())
            .build()
            .unwrap();
        registry.register(timer).unwrap();
    }
    registry.arm_all(at_ms(100), &mut NoJitter);

    let clock = MockTimeSource::new();
    clock.set_time(at_ms(100));
    let mut output = MockOutput::new();
    let mut remaining = 12_000;

    // 1ms per pass for 12 seconds: two full cycles of four transitions
    let passes = registry.run(&clock, &mut NoJitter, &mut output, || {
        clock.advance(ms(1));
        remaining -= 1;
        remaining >= 0
    });

    assert_eq!(passes, 12_000);
    assert_eq!(output.history().len(), 3 * 8);
    for chunk in output.history().chunks(3) {
        let lit = chunk[0].1 != COLOR_OFF;
        assert!(chunk.iter().all(|(_, color)| (*color != COLOR_OFF) == lit));
    }
    let states: heapless::Vec<LightState, 3> = registry.iter().map(|t| t.state()).collect();
    assert!(states.iter().all(|s| *s == states[0]));
}

#[test]
fn run_without_passes_changes_nothing() {
    let mut registry = Registry::new();
    registry.register(light("idle", 0, RED, &[ms(500)])).unwrap();
    registry.arm_all(at_ms(0), &mut NoJitter);

    let clock = MockTimeSource::new();
    let mut output = MockOutput::new();
    let passes = registry.run(&clock, &mut NoJitter, &mut output, || false);

    assert_eq!(passes, 0);
    assert!(output.history().is_empty());
    assert_eq!(registry.get(0).unwrap().state(), LightState::Off);
}
