//! Navigation-related controller methods (screen preloads, search, details, lyrics)

use crate::model::{CatalogError, Screen, SelectedItem, SongInfo};
use super::AppController;

impl AppController {
    /// Initial content for every screen, fetched concurrently
    pub async fn preload_screens(&self) {
        tracing::info!("Preloading screens");
        let song_query = self.config.preload_song_query.clone();
        futures::join!(
            self.search_songs(&song_query, false),
            self.search_artists(""),
            self.search_albums(""),
            self.load_suggested(),
        );
    }

    /// Submit the search box of the current screen
    pub async fn submit_search(&self) {
        let (screen, query) = {
            let model = self.model.lock().await;
            model.unfocus_search().await;
            (model.current_screen().await, model.get_search_query().await)
        };

        match screen {
            Screen::Songs => self.search_songs(&query, true).await,
            Screen::Artists => self.search_artists(&query).await,
            Screen::Albums => self.search_albums(&query).await,
            _ => {}
        }
    }

    pub async fn search_songs(&self, query: &str, save_to_recent: bool) {
        let query = query.trim().to_string();
        let ticket = {
            let model = self.model.lock().await;
            let mut content = model.content_state.lock().await;
            content.songs.begin_search(&query)
        };
        let Some(ticket) = ticket else {
            tracing::debug!("Blank song query, list cleared");
            return;
        };

        tracing::debug!(query = %query, "Searching songs");
        let catalog = self.catalog().await;
        let result = catalog.search_songs(&query, self.config.search_limit).await;
        if let Ok(songs) = &result {
            tracing::info!(query = %query, count = songs.len(), "Song search completed");
        }
        let popup = user_facing_error(&result, save_to_recent);

        let model = self.model.lock().await;
        model
            .content_state
            .lock()
            .await
            .songs
            .finish_search(ticket, &query, save_to_recent, result);
        if let Some(message) = popup {
            model.set_error(message).await;
        }
    }

    /// Blank queries fall back to the configured top artists
    pub async fn search_artists(&self, query: &str) {
        let (ticket, query) = {
            let model = self.model.lock().await;
            let mut content = model.content_state.lock().await;
            let query = content.artists.effective_query(query);
            (content.artists.begin_search(), query)
        };

        tracing::debug!(query = %query, "Searching artists");
        let catalog = self.catalog().await;
        let result = catalog.search_artists(&query, self.config.search_limit).await;

        let model = self.model.lock().await;
        model.content_state.lock().await.artists.finish_search(ticket, result);
    }

    pub async fn search_albums(&self, query: &str) {
        let (ticket, query) = {
            let model = self.model.lock().await;
            let mut content = model.content_state.lock().await;
            let query = content.albums.effective_query(query);
            (content.albums.begin_search(), query)
        };

        tracing::debug!(query = %query, "Searching albums");
        let catalog = self.catalog().await;
        let result = catalog.search_albums(&query, self.config.search_limit).await;

        let model = self.model.lock().await;
        model.content_state.lock().await.albums.finish_search(ticket, result);
    }

    /// Trending songs, popular albums, recommended artists and charts.
    /// Each section fails on its own.
    pub async fn load_suggested(&self) {
        let (trending, albums, artists, charts) = {
            let model = self.model.lock().await;
            let mut content = model.content_state.lock().await;
            let suggested = &mut content.suggested;
            (
                suggested.trending.begin(),
                suggested.albums.begin(),
                suggested.artists.begin(),
                suggested.charts.begin(),
            )
        };

        let catalog = self.catalog().await;
        let limit = self.config.search_limit;
        let (songs, album_list, artist_list, feed) = futures::join!(
            catalog.search_songs(&self.config.preload_song_query, limit),
            catalog.search_albums(&self.config.preload_album_query, limit),
            catalog.search_artists(&self.config.preload_artist_query, limit),
            catalog.home_feed(&self.config.home_language),
        );

        let model = self.model.lock().await;
        let mut content = model.content_state.lock().await;
        let suggested = &mut content.suggested;
        suggested.finish_trending(trending, songs);
        suggested.finish_albums(albums, album_list);
        suggested.finish_artists(artists, artist_list);
        suggested.finish_charts(charts, feed);
        tracing::info!(
            trending = suggested.trending.data.len(),
            albums = suggested.albums.data.len(),
            artists = suggested.artists.data.len(),
            charts = suggested.charts.data.len(),
            "Suggestions loaded"
        );
    }

    pub async fn open_artist(&self, artist_id: &str) {
        let ticket = {
            let model = self.model.lock().await;
            model.content_state.lock().await.open_artist(artist_id)
        };

        let catalog = self.catalog().await;
        let result = catalog.artist_detail(artist_id).await;

        let model = self.model.lock().await;
        model.content_state.lock().await.finish_artist(ticket, result);
    }

    pub async fn open_album(&self, album_id: &str) {
        let ticket = {
            let model = self.model.lock().await;
            model.content_state.lock().await.open_album(album_id)
        };

        let catalog = self.catalog().await;
        let result = catalog.album_detail(album_id).await;

        let model = self.model.lock().await;
        model.content_state.lock().await.finish_album(ticket, result);
    }

    /// Open the lyrics popup for the track that is playing
    pub async fn show_lyrics(&self) {
        let snapshot = self.player.snapshot();
        let Some(current) = snapshot.current.as_ref() else {
            self.model.lock().await.set_error("Nothing is playing".to_string()).await;
            return;
        };
        let Some(song_id) = current.track_id.clone() else {
            return;
        };

        let ticket = {
            let model = self.model.lock().await;
            model.show_lyrics_popup().await;
            model.content_state.lock().await.lyrics.begin(&song_id, &current.title)
        };

        let catalog = self.catalog().await;
        let result = catalog.lyrics(&song_id).await;

        let model = self.model.lock().await;
        model.content_state.lock().await.lyrics.finish(ticket, result);
    }

    /// Act on the entry under the cursor
    pub async fn handle_selected_item(&self, item: SelectedItem) {
        match item {
            SelectedItem::Song { songs, index } => {
                let (queue, start) = SongInfo::queue_from(&songs, index);
                if queue.is_empty() {
                    self.model
                        .lock()
                        .await
                        .set_error("This song has no playable stream".to_string())
                        .await;
                    return;
                }
                self.play_queue(queue, start).await;
            }
            SelectedItem::Artist { id } => self.open_artist(&id).await,
            SelectedItem::Album { id } => self.open_album(&id).await,
            SelectedItem::QueueEntry { index } => self.player.play_queue_index(index),
            SelectedItem::RecentSearch { query } => {
                {
                    let model = self.model.lock().await;
                    model.content_state.lock().await.songs.query = query.clone();
                }
                self.search_songs(&query, true).await;
            }
        }
    }
}

/// Popup text for searches the user typed; preloads only fill the inline error
fn user_facing_error<T>(result: &Result<T, CatalogError>, user_initiated: bool) -> Option<String> {
    match result {
        Err(e) if user_initiated && !e.is_unsuccessful() => Some(AppController::format_error(e)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::config::AppConfig;
    use crate::controller::test_support::NullSink;
    use crate::model::{
        Album, AlbumDetail, AppModel, Artist, ArtistDetail, Catalog, CatalogResult, Chart,
        ContentState, DetailView, HomeFeed, Lyrics, PlayerController, Song,
    };

    /// Answers from canned data; queries starting with "slow" take a while
    #[derive(Default)]
    struct ScriptedCatalog {
        fail_songs: bool,
        calls: StdMutex<Vec<String>>,
    }

    fn song(id: &str) -> Song {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Song {id}"),
            "duration": 120,
            "downloadUrl": [{ "quality": "320kbps", "url": format!("https://cdn/{id}.mp4") }]
        }))
        .unwrap()
    }

    #[async_trait]
    impl Catalog for ScriptedCatalog {
        async fn search_songs(&self, query: &str, _: u32) -> CatalogResult<Vec<Song>> {
            self.calls.lock().unwrap().push(format!("songs:{query}"));
            if query.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            if self.fail_songs {
                return Err(CatalogError::Status { endpoint: "search/songs".into(), status: 503 });
            }
            Ok(vec![song(query)])
        }

        async fn search_artists(&self, query: &str, _: u32) -> CatalogResult<Vec<Artist>> {
            self.calls.lock().unwrap().push(format!("artists:{query}"));
            Ok(vec![Artist { id: "1".into(), name: query.into(), ..Default::default() }])
        }

        async fn search_albums(&self, query: &str, _: u32) -> CatalogResult<Vec<Album>> {
            self.calls.lock().unwrap().push(format!("albums:{query}"));
            Err(CatalogError::Unsuccessful { endpoint: "search/albums".into() })
        }

        async fn artist_detail(&self, id: &str) -> CatalogResult<ArtistDetail> {
            Ok(ArtistDetail {
                id: id.into(),
                name: "Arijit Singh".into(),
                top_songs: Some(vec![song("t1"), song("t2")]),
                ..Default::default()
            })
        }

        async fn album_detail(&self, _: &str) -> CatalogResult<AlbumDetail> {
            Err(CatalogError::MissingData { endpoint: "albums".into() })
        }

        async fn home_feed(&self, language: &str) -> CatalogResult<HomeFeed> {
            self.calls.lock().unwrap().push(format!("modules:{language}"));
            Ok(HomeFeed {
                charts: Some(vec![Chart { id: "c".into(), title: "Top 50".into(), ..Default::default() }]),
                ..Default::default()
            })
        }

        async fn lyrics(&self, _: &str) -> CatalogResult<Option<Lyrics>> {
            Ok(Some(Lyrics { lyrics: Some("la la".into()), snippet: None }))
        }
    }

    fn controller_with(catalog: ScriptedCatalog) -> (AppController, Arc<ScriptedCatalog>) {
        let catalog = Arc::new(catalog);
        let config = AppConfig::default();
        let player = PlayerController::new(Arc::new(NullSink));
        let content = ContentState::new(
            &config.preload_song_query,
            &config.preload_artist_query,
            &config.preload_album_query,
        );
        let model = AppModel::new(catalog.clone(), player.clone(), content);
        (AppController::new(Arc::new(Mutex::new(model)), player, config), catalog)
    }

    async fn content(controller: &AppController) -> ContentState {
        controller.model.lock().await.get_content_state().await
    }

    #[tokio::test]
    async fn preload_fills_every_screen_without_recents() {
        let (controller, catalog) = controller_with(ScriptedCatalog::default());
        controller.preload_screens().await;

        let content = content(&controller).await;
        assert_eq!(content.songs.results.data[0].id, "Latest");
        assert!(content.songs.recent.is_empty());
        assert_eq!(content.artists.results.data[0].name, "Arijit");
        assert_eq!(content.albums.results.error.as_deref(), Some("Failed to fetch albums"));
        assert_eq!(content.suggested.trending.data.len(), 1);
        assert!(content.suggested.albums.data.is_empty());
        assert_eq!(content.suggested.charts.data[0].title, "Top 50");
        assert!(!content.suggested.is_loading());

        let calls = catalog.calls.lock().unwrap().clone();
        assert!(calls.contains(&"modules:hindi,english".to_string()));
        assert!(calls.contains(&"albums:Top".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_search_does_not_overwrite_newer_one() {
        let (controller, _) = controller_with(ScriptedCatalog::default());

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.search_songs("slow query", true).await })
        };
        tokio::task::yield_now().await;
        controller.search_songs("fast", true).await;
        slow.await.unwrap();

        let content = content(&controller).await;
        assert_eq!(content.songs.results.data[0].id, "fast");
        assert_eq!(content.songs.recent.items(), ["fast"]);
    }

    #[tokio::test]
    async fn failed_user_search_shows_popup() {
        let (controller, _) = controller_with(ScriptedCatalog { fail_songs: true, ..Default::default() });

        controller.search_songs("Latest", false).await;
        assert!(!controller.model.lock().await.has_error().await);

        controller.search_songs("kesariya", true).await;
        let model = controller.model.lock().await;
        assert!(model.has_error().await);
        assert!(model.get_content_state().await.songs.results.data.is_empty());
    }

    #[tokio::test]
    async fn selecting_a_song_queues_the_whole_list() {
        let (controller, _) = controller_with(ScriptedCatalog::default());
        let songs = vec![song("a"), song("b"), song("c")];

        controller.handle_selected_item(SelectedItem::Song { songs, index: 1 }).await;

        let snapshot = controller.player.snapshot();
        assert_eq!(snapshot.queue.len(), 3);
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Song b"));
    }

    #[tokio::test]
    async fn opening_details_pushes_pages() {
        let (controller, _) = controller_with(ScriptedCatalog::default());
        controller.handle_selected_item(SelectedItem::Artist { id: "459320".into() }).await;
        controller.handle_selected_item(SelectedItem::Album { id: "9".into() }).await;

        let content = content(&controller).await;
        assert_eq!(content.navigation_stack.len(), 2);
        match &content.navigation_stack[0] {
            DetailView::Artist(artist) => assert_eq!(artist.top_songs().len(), 2),
            other => panic!("unexpected page {other:?}"),
        }
        match &content.navigation_stack[1] {
            DetailView::Album(album) => {
                assert_eq!(album.detail.error.as_deref(), Some("Album not found"))
            }
            other => panic!("unexpected page {other:?}"),
        }
    }

    #[tokio::test]
    async fn recent_search_reruns_query() {
        let (controller, catalog) = controller_with(ScriptedCatalog::default());
        controller
            .handle_selected_item(SelectedItem::RecentSearch { query: "kesariya".into() })
            .await;

        let content = content(&controller).await;
        assert_eq!(content.songs.query, "kesariya");
        assert_eq!(content.songs.recent.items(), ["kesariya"]);
        assert!(catalog.calls.lock().unwrap().contains(&"songs:kesariya".to_string()));
    }

    #[tokio::test]
    async fn lyrics_need_a_playing_track() {
        let (controller, _) = controller_with(ScriptedCatalog::default());
        controller.show_lyrics().await;
        assert!(controller.model.lock().await.has_error().await);

        controller.player.set_queue(vec![SongInfo::from_song(&song("a")).unwrap()], 0);
        controller.show_lyrics().await;
        let model = controller.model.lock().await;
        assert!(model.is_lyrics_popup_open().await);
        assert_eq!(model.get_content_state().await.lyrics.display_text(), "la la");
    }
}
