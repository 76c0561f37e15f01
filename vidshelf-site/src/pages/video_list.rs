use gloo_net::http::Request;
use vidshelf_api::api::videos::get::VideoDescriptor;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Image shown for videos without a thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "noimage.png";

pub const FETCH_FAILED_MESSAGE: &str = "動画一覧の取得に失敗しました";

/// What a video card displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub image: String,
    pub title: String,
    pub subtitle: String,
}

impl From<&VideoDescriptor> for Card {
    fn from(video: &VideoDescriptor) -> Self {
        Self {
            image: video.thumbnail_or(PLACEHOLDER_THUMBNAIL).to_string(),
            title: video.title.clone(),
            subtitle: video.channel_or_empty().to_string(),
        }
    }
}

pub fn parse_video_list(body: &str) -> anyhow::Result<Vec<VideoDescriptor>> {
    Ok(serde_json::from_str(body)?)
}

/// Interprets a `/api/videos` response. A non-2xx status is a failure whatever the body holds.
pub fn parse_response(
    ok: bool,
    status: u16,
    body: &str,
) -> anyhow::Result<Vec<VideoDescriptor>> {
    if !ok {
        anyhow::bail!("Response is not successful: {status}");
    }
    parse_video_list(body)
}

async fn fetch_videos() -> anyhow::Result<Vec<VideoDescriptor>> {
    let response = Request::get("/api/videos").send().await?;
    let body = response.text().await?;
    parse_response(response.ok(), response.status(), &body)
}

/// Turns the result of fetching the list into cards, in server order.
///
/// A failure is logged and reported once through `alert`, and no card is shown.
pub fn cards_or_alert(
    result: anyhow::Result<Vec<VideoDescriptor>>,
    alert: impl FnOnce(&str),
) -> Vec<Card> {
    match result {
        Ok(videos) => videos.iter().map(Card::from).collect(),
        Err(e) => {
            log::error!("Failed to fetch the video list: {e:?}");
            alert(FETCH_FAILED_MESSAGE);
            vec![]
        }
    }
}

fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.alert_with_message(message) {
        log::error!("Failed to show alert: {e:?}");
    }
}

#[derive(Properties, PartialEq)]
pub struct VideoCardProps {
    pub card: Card,
}

#[function_component(VideoCard)]
pub fn video_card(VideoCardProps { card }: &VideoCardProps) -> Html {
    html! {
        <div class="video-card">
            <img src={card.image.clone()} alt={card.title.clone()} />
            <div class="info">
                <div class="title">{ &card.title }</div>
                <small>{ &card.subtitle }</small>
            </div>
        </div>
    }
}

#[function_component(VideoList)]
pub fn video_list() -> Html {
    let cards = use_state(Vec::<Card>::new);

    {
        let cards = cards.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                cards.set(cards_or_alert(fetch_videos().await, alert));
            });
            || ()
        });
    }

    html! {
        <div class="page video-list-page">
            <header class="header">
                <h1>{ "動画一覧" }</h1>
            </header>
            <div id="video-list">
                { for cards.iter().map(|card| html! { <VideoCard card={card.clone()} /> }) }
            </div>
        </div>
    }
}
