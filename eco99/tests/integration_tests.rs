//! Integration tests for eco99: feeds served over HTTP by a mock server

use eco99::covers::DEFAULT_DUPLICATE_PREFIX;
use eco99::extract::fetch_channels;
use eco99::{FeedClient, FeedSource, MenuStyle, Plugin, RecordingHost, Router};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE: &str = "plugin://plugin.audio.eco99/";

fn channel_index(server_uri: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>eco99fm music channels</title>
    <item>
      <title>Israeli Rock</title>
      <link>{server_uri}/channels/rock</link>
      <description><![CDATA[<img src='{prefix}https://cdn.example/SetsCategories/rock.jpg' />]]></description>
      <itunes:summary>Guitars &amp; more</itunes:summary>
    </item>
    <item>
      <title>Chill</title>
      <link>{server_uri}/channels/chill</link>
      <description><![CDATA[<img src='{prefix}chill.jpg' />]]></description>
      <itunes:summary>Slow evenings</itunes:summary>
    </item>
  </channel>
</rss>"#,
        prefix = DEFAULT_DUPLICATE_PREFIX
    )
}

fn rock_playlist() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Israeli Rock</title>
    <item>
      <title>Set 1</title>
      <guid>http://eco99fm.example/sets/1</guid>
      <description><![CDATA[<img src='{prefix}{prefix}set1.jpg' />]]></description>
      <itunes:summary>First set</itunes:summary>
      <enclosure url="http://cdn.example/sets/1/playlist.m3u8?token=a&amp;b=c" type="application/x-mpegURL" />
    </item>
  </channel>
</rss>"#,
        prefix = DEFAULT_DUPLICATE_PREFIX
    )
}

async fn mock_feeds() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(ResponseTemplate::new(200).set_body_string(channel_index(&mock_server.uri())))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels/rock"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rock_playlist()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel><item></rss>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mock_server
}

fn plugin(index_url: String) -> Plugin<FeedClient> {
    Plugin::new(
        FeedClient::new().unwrap(),
        Router::new(BASE),
        index_url,
        MenuStyle::new(DEFAULT_DUPLICATE_PREFIX, Path::new("/addons/plugin.audio.eco99")),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_feed_over_http() {
    let mock_server = mock_feeds().await;
    let url = format!("{}/index", mock_server.uri());

    let body = tokio::task::spawn_blocking(move || FeedClient::new().unwrap().fetch(&url))
        .await
        .unwrap()
        .unwrap();

    assert!(body.contains("Israeli Rock"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_error_status_is_network_error() {
    let mock_server = mock_feeds().await;
    let url = format!("{}/missing", mock_server.uri());

    let err = tokio::task::spawn_blocking(move || FeedClient::new().unwrap().fetch(&url))
        .await
        .unwrap()
        .unwrap_err();

    assert!(err.is_network(), "unexpected error: {err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_channels_from_http_feed() {
    let mock_server = mock_feeds().await;
    let uri = mock_server.uri();
    let index_url = format!("{uri}/index");

    let channels = tokio::task::spawn_blocking(move || {
        let client = FeedClient::new().unwrap();
        fetch_channels(&client, &Router::new(BASE), &index_url)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].index, 1);
    assert_eq!(channels[0].title, "Israeli Rock");
    assert_eq!(channels[0].description, "Guitars & more");
    assert_eq!(channels[1].index, 2);
    assert_eq!(channels[1].title, "Chill");

    let params = Router::new(BASE).decode(&channels[1].navigation_url).unwrap();
    assert_eq!(params["mode"], "playlist");
    assert_eq!(params["url"], format!("{uri}/channels/chill"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_navigation_from_root_to_playback() {
    let mock_server = mock_feeds().await;
    let index_url = format!("{}/index", mock_server.uri());

    let (root, playlist, playback) = tokio::task::spawn_blocking(move || {
        let plugin = plugin(index_url);

        // Root menu
        let mut root = RecordingHost::default();
        plugin.run(&mut root, 10, "").unwrap();

        // Open the first channel with the query of its entry
        let channel_url = root.listings[0].1[0].url.clone();
        let query = &channel_url[BASE.len()..];
        let mut playlist = RecordingHost::default();
        plugin.run(&mut playlist, 11, query).unwrap();

        // Play the first stream
        let stream_url = playlist.listings[0].1[0].url.clone();
        let query = &stream_url[BASE.len()..];
        let mut playback = RecordingHost::default();
        plugin.run(&mut playback, 12, query).unwrap();

        (root, playlist, playback)
    })
    .await
    .unwrap();

    // Channels are folders, with category covers cleaned of the single prefix
    let channels: Vec<_> = root.entries().collect();
    assert_eq!(channels.len(), 2);
    assert!(channels.iter().all(|e| e.is_folder && !e.item.is_playable()));
    let art = channels[0].item.art.as_ref().unwrap();
    assert_eq!(art.thumb, "https://cdn.example/SetsCategories/rock.jpg");
    // A single prefix on a regular cover is kept
    let art = channels[1].item.art.as_ref().unwrap();
    assert_eq!(art.poster, format!("{DEFAULT_DUPLICATE_PREFIX}chill.jpg"));
    assert_eq!(art.fanart, "/addons/plugin.audio.eco99/resources/media/fanart.jpg");
    assert_eq!(root.content, vec![(10, "musicvideos".to_string())]);
    assert_eq!(root.ended, vec![10]);

    // Streams are playable, duplicated prefixes are stripped once
    let streams: Vec<_> = playlist.entries().collect();
    assert_eq!(streams.len(), 1);
    assert!(!streams[0].is_folder);
    assert!(streams[0].item.is_playable());
    let art = streams[0].item.art.as_ref().unwrap();
    assert_eq!(art.thumb, format!("{DEFAULT_DUPLICATE_PREFIX}set1.jpg"));
    assert_eq!(playlist.ended, vec![11]);

    // Playback gets the enclosure URL untouched
    assert!(playback.listings.is_empty());
    assert_eq!(playback.resolved.len(), 1);
    let (handle, succeeded, item) = &playback.resolved[0];
    assert_eq!(*handle, 12);
    assert!(*succeeded);
    assert_eq!(
        item.path.as_deref(),
        Some("http://cdn.example/sets/1/playlist.m3u8?token=a&b=c")
    );
    assert_eq!(playback.ended, vec![12]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_playlist_is_parse_error() {
    let mock_server = mock_feeds().await;
    let index_url = format!("{}/index", mock_server.uri());
    let broken_url = format!("{}/broken", mock_server.uri());
    let query = Router::new("").build([("mode", "playlist"), ("url", broken_url.as_str())]);

    let (result, host) = tokio::task::spawn_blocking(move || {
        let mut host = RecordingHost::default();
        let result = plugin(index_url).run(&mut host, 3, &query);
        (result, host)
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(eco99::Error::Parse(_))));
    assert!(host.listings.is_empty());
    assert!(host.ended.is_empty());
}
