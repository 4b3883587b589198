use super::*;

// =============================================================
// Public projection
// =============================================================

#[test]
fn projection_keeps_only_whitelisted_keys() {
    let admin = json!({
        "announcement": { "enabled": true },
        "billing": { "trialDays": 14 },
        "integrations": { "stripeKey": "sk_live" },
        "secret": 1
    });
    let public = project_public(&admin);
    assert_eq!(public, json!({ "announcement": { "enabled": true } }));
}

#[test]
fn projection_of_defaults_drops_admin_sections() {
    let public = project_public(&default_settings());
    let keys: Vec<&str> = public.as_object().unwrap().keys().map(String::as_str).collect();
    for key in &keys {
        assert!(PUBLIC_KEYS.contains(key));
    }
    assert!(public.get("billing").is_none());
    assert!(public.get("integrations").is_none());
    assert_eq!(keys.len(), PUBLIC_KEYS.len());
}

#[test]
fn projection_of_non_object_is_empty() {
    assert_eq!(project_public(&json!([1, 2])), json!({}));
}

// =============================================================
// Typed views
// =============================================================

#[test]
fn defaults_render_through_views() {
    let settings = default_settings();
    assert!(!settings.announcement().is_visible());
    assert!(!settings.maintenance().enabled);
    assert_eq!(settings.branding().site_name, "ExamPrep");
    assert_eq!(settings.branding().logo_data_url, None);
}

#[test]
fn announcement_visible_requires_text() {
    let on = json!({ "announcement": { "enabled": true, "text": "Finals week!", "tone": "warning" } });
    let announcement = on.announcement();
    assert!(announcement.is_visible());
    assert_eq!(announcement.tone, Tone::Warning);
    assert_eq!(announcement.tone.css_modifier(), "warning");

    let blank = json!({ "announcement": { "enabled": true, "text": "  " } });
    assert!(!blank.announcement().is_visible());
}

#[test]
fn malformed_section_falls_back_to_default() {
    let odd = json!({ "maintenance": "yes", "support": { "email": 5 } });
    assert_eq!(odd.maintenance(), Maintenance::default());
    assert_eq!(odd.support(), Support::default());
}
