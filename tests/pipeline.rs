use std::sync::Arc;
use std::time::Duration;

use skycube::params::{LiveParams, ParamsUpdate, SkyParams};
use skycube::scene::Scene;
use skycube::scheduler::Regenerator;

const SIZE: usize = 16;

#[test]
fn generation_reports_staged_timings() {
    let params = SkyParams::default();
    let (cube, timings) = skycube::generate(params, 8);

    assert_eq!(cube.size, 8);
    assert_eq!(cube.params, params);
    assert!(cube.faces.iter().all(|f| f.len() == 8 * 8 * 4));

    let names: Vec<&str> = timings.iter().map(|t| t.name).collect();
    assert_eq!(names, ["sky_model", "px", "nx", "py", "ny", "pz", "nz", "TOTAL"]);
    assert!(timings.iter().all(|t| t.ms >= 0.0));
}

#[tokio::test]
async fn burst_of_slider_changes_publishes_the_final_sky() {
    let params = Arc::new(LiveParams::default());
    let scene = Arc::new(Scene::new());
    let regen = Regenerator::new(Arc::clone(&params), Arc::clone(&scene), SIZE);

    let mut rx = scene.subscribe();

    // Initial render, then a quick drag across the sun-elevation slider.
    regen.notify_change();
    let mut last = 0.0;
    for i in 0..6 {
        last = 0.5 + i as f32 * 0.0625;
        params.apply(ParamsUpdate {
            sun_elevation: Some(last),
            ..Default::default()
        });
        regen.notify_change();
    }

    // Publishes arrive until the drag's final value has been rendered.
    let cube = loop {
        tokio::time::timeout(Duration::from_secs(10), rx.changed())
            .await
            .expect("no publish within 10s")
            .unwrap();
        let cube = scene.current().1.unwrap();
        if cube.params.sun_elevation == last {
            break cube;
        }
    };

    assert_eq!(cube.size, SIZE);
    assert!(cube.faces.iter().all(|f| f.len() == SIZE * SIZE * 4));

    // Both sinks hold the same allocation.
    let refl = scene.reflection_map().unwrap();
    assert!(Arc::ptr_eq(&refl, &scene.background().unwrap()));

    // The published faces match a direct generation of the same snapshot.
    let (direct, _) = skycube::generate(cube.params, SIZE);
    assert_eq!(direct.faces, cube.faces);

    // Everything settles back to idle.
    for _ in 0..1000 {
        if !regen.is_busy() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert!(!regen.is_busy());
}
