use std::sync::LazyLock;

pub static SPOTIFY_URL_REGEX: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(
        r"(?:https?://)?(?:open\.)?spotify\.com/(?:intl-[a-z]+(?:-[A-Za-z]+)?/)?(track|album)/([a-zA-Z0-9]{22})",
    )
    .unwrap()
});

pub static YOUTUBE_VIDEO_URL_REGEX: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r"(?:https?://)?(?:(?:www\.|m\.)?youtube\.com/watch\?(?:[^\s#]*&)?v=|(?:www\.)?youtu\.be/|(?:music\.youtube\.com)/watch\?(?:[^\s#]*&)?v=)([a-zA-Z0-9_-]{11})").unwrap()
});

pub static YOUTUBE_PLAYLIST_URL_REGEX: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(
        r"(?:https?://)?(?:www\.|m\.|music\.)?youtube\.com/playlist\?(?:[^\s#]*&)?list=([a-zA-Z0-9_-]+)",
    )
    .unwrap()
});

// Track links carry the track id in the `i` query parameter; a bare album
// path is an album link.
pub static APPLE_URL_REGEX: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(
        r"(?:https?://)?(?:music|itunes)\.apple\.com/(?:[a-z]{2}/)?album/(?:[^/\s?]+/)?(?:id)?(\d+)(?:\?(?:[^\s#]*&)?i=(\d+))?",
    )
    .unwrap()
});

pub static PARENS_REGEX: LazyLock<fancy_regex::Regex> =
    LazyLock::new(|| fancy_regex::Regex::new(r"\([^(]*\)").unwrap());
