// Host-side tests for the model catalog and asset URL layout.

mod common;

use common::catalog::*;
use glam::Vec3;

#[test]
fn default_scales_match_table() {
    let c = Catalog::default();
    assert_eq!(c.scale_for(ModelId(1)), Vec3::splat(5.0));
    assert_eq!(c.scale_for(ModelId(2)), Vec3::splat(0.01));
    assert_eq!(c.scale_for(ModelId(3)), Vec3::splat(0.06));
    assert_eq!(c.scale_for(ModelId(4)), Vec3::splat(0.03));
    assert_eq!(c.scale_for(ModelId(5)), Vec3::splat(0.3));
}

#[test]
fn unknown_id_falls_back_to_unit_scale_and_no_sound() {
    let c = Catalog::default();
    assert_eq!(c.scale_for(ModelId(42)), Vec3::ONE);
    assert_eq!(c.sound_for(ModelId(42)), None);
    assert_eq!(c.sound_for(ModelId(5)), None);
}

#[test]
fn default_sounds_match_table() {
    let c = Catalog::default();
    assert_eq!(c.sound_for(ModelId(1)), Some("a.mp3"));
    assert_eq!(c.sound_for(ModelId(2)), Some("b.mp3"));
    assert_eq!(c.sound_for(ModelId(3)), Some("c.mp3"));
    assert_eq!(c.sound_for(ModelId(4)), Some("d.mp3"));
}

#[test]
fn urls_use_default_layout() {
    let cfg = ViewerConfig::default();
    assert_eq!(cfg.model_url(ModelId(3)), "../../assets/models/ELE3.glb");
    assert_eq!(cfg.quick_look_url(ModelId(3)), "../../assets/models/ELE3.usdz");
    assert_eq!(cfg.light_probe_url(), "../../assets/hdr/venice_sunset_1k.hdr");
    assert_eq!(cfg.sound_url("b.mp3"), "./assets/audio/b.mp3");
}

#[test]
fn overrides_replace_paths_and_add_trailing_slash() {
    let cfg = ViewerConfig::default().with_overrides(|key| match key {
        "assetsPath" => Some("/cdn/models".to_string()),
        "audioPath" => Some("/cdn/sfx/".to_string()),
        _ => None,
    });
    assert_eq!(cfg.assets_path, "/cdn/models/");
    assert_eq!(cfg.audio_path, "/cdn/sfx/");
    assert_eq!(cfg.hdr_path, "../../assets/hdr/");
    assert_eq!(cfg.model_url(ModelId(1)), "/cdn/models/ELE1.glb");
}

#[test]
fn default_catalog_validates() {
    assert_eq!(Catalog::default().validate(), Ok(()));
}

#[test]
fn validate_rejects_bad_scales() {
    let mut c = Catalog::default();
    c.set_scale(ModelId(9), Vec3::new(1.0, 0.0, 1.0));
    assert!(matches!(
        c.validate(),
        Err(CatalogError::InvalidScale { id: ModelId(9), .. })
    ));

    let mut c = Catalog::default();
    c.set_scale(ModelId(9), Vec3::new(f32::NAN, 1.0, 1.0));
    assert!(matches!(c.validate(), Err(CatalogError::InvalidScale { .. })));
}

#[test]
fn validate_rejects_escaping_sound_names() {
    for bad in ["/etc/a.mp3", "../a.mp3", "https://x/a.mp3"] {
        let mut c = Catalog::default();
        c.set_sound(ModelId(7), bad);
        assert_eq!(
            c.validate(),
            Err(CatalogError::NonRelativeSound {
                id: ModelId(7),
                file: bad.to_string()
            }),
            "{bad}"
        );
    }
    let mut c = Catalog::default();
    c.set_sound(ModelId(7), "  ");
    assert_eq!(c.validate(), Err(CatalogError::EmptySound { id: ModelId(7) }));
}

#[test]
fn validate_rejects_empty_paths() {
    let mut cfg = ViewerConfig::default();
    cfg.hdr_path = String::new();
    let c = Catalog::default().with_config(cfg);
    assert_eq!(c.validate(), Err(CatalogError::EmptyPath { name: "hdr" }));
}

#[test]
fn empty_catalog_has_no_mappings() {
    let c = Catalog::empty(ViewerConfig::default());
    assert_eq!(c.scale_for(ModelId(1)), Vec3::ONE);
    assert_eq!(c.sound_for(ModelId(1)), None);
    assert_eq!(c.validate(), Ok(()));
}
