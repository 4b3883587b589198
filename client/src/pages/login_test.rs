use super::*;

#[test]
fn post_login_path_defaults_to_home() {
    assert_eq!(post_login_path(None), "/");
    assert_eq!(post_login_path(Some("")), "/");
}

#[test]
fn post_login_path_keeps_local_paths() {
    assert_eq!(post_login_path(Some("/admin/settings")), "/admin/settings");
    assert_eq!(post_login_path(Some(" /courses?id=4 ")), "/courses?id=4");
}

#[test]
fn post_login_path_rejects_external_targets() {
    assert_eq!(post_login_path(Some("https://evil.example")), "/");
    assert_eq!(post_login_path(Some("//evil.example/x")), "/");
}

#[test]
fn post_login_path_does_not_loop_back_to_login() {
    assert_eq!(post_login_path(Some("/login")), "/");
    assert_eq!(post_login_path(Some("/login?next=/")), "/");
}
