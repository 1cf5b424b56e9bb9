use clickscope::url_reduce::{domain_of, path_prefix_of, NO_DOMAIN};

#[test]
fn domain_of_absolute_urls() {
    assert_eq!(domain_of("https://a.b/x"), "a.b");
    assert_eq!(domain_of("http://news.example.com/story?id=4"), "news.example.com");
    assert_eq!(domain_of("http://localhost:8080/admin"), "localhost:8080");
    assert_eq!(domain_of("android-app://com.google.android.gm/"), "com.google.android.gm");
}

#[test]
fn domain_of_without_network_location() {
    assert_eq!(domain_of("/just/a/path"), NO_DOMAIN);
    assert_eq!(domain_of("www.example.com/page"), "-");
    assert_eq!(domain_of(""), "-");
    assert_eq!(domain_of("not a url at all"), "-");
    assert_eq!(domain_of("mailto:someone@example.com"), "-");
}

#[test]
fn path_prefix_keeps_first_two_segments() {
    assert_eq!(path_prefix_of("/a/b/c/d"), "a/b");
    assert_eq!(path_prefix_of("/a/b"), "a/b");
    assert_eq!(path_prefix_of("https://shop.example.com/cart/items/42?x=1"), "cart/items");
    assert_eq!(path_prefix_of("blog/posts/2024/hello"), "blog/posts");
}

#[test]
fn shallow_paths_are_unchanged() {
    assert_eq!(path_prefix_of("/a"), "/a");
    assert_eq!(path_prefix_of("/"), "/");
    assert_eq!(path_prefix_of(""), "");
    assert_eq!(path_prefix_of("/pricing/"), "/pricing/");
    assert_eq!(path_prefix_of("https://example.com/about"), "/about");
}

#[test]
fn empty_segments_are_not_counted() {
    assert_eq!(path_prefix_of("//"), "");
    assert_eq!(path_prefix_of("/a//b/c"), "a/b");
}

#[test]
fn domain_keeps_case_port_and_raw_host_text() {
    assert_eq!(domain_of("https://Shop.Example.COM/x"), "Shop.Example.COM");
    assert_eq!(domain_of("https://a.b:443/x"), "a.b:443");
    assert_eq!(domain_of("http://exa mple.com/"), "exa mple.com");
    assert_eq!(domain_of("https://user:pw@login.example.com:8443/"), "login.example.com:8443");
    assert_eq!(domain_of("https://"), "-");
}

#[test]
fn path_is_taken_verbatim() {
    assert_eq!(path_prefix_of("https://a.b"), "");
    assert_eq!(path_prefix_of("https://a.b?utm=1"), "");
    assert_eq!(path_prefix_of("http://x/summer sale/shoes/1"), "summer sale/shoes");
    assert_eq!(path_prefix_of("http://x/caf\u{e9}/menu/1"), "caf\u{e9}/menu");
    assert_eq!(path_prefix_of("http://x/Deals/Today/"), "Deals/Today");
}
