use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::video_list::VideoList;
use crate::pages::watcher::Watcher;

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum Route {
    #[at("/")]
    Home,

    #[at("/watcher")]
    Watcher,

    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => {
            html! {
                <VideoList>
                </VideoList>
            }
        }
        Route::Watcher => {
            html! {
                <Watcher>
                </Watcher>
            }
        }
        Route::NotFound => {
            html! {
                <Redirect<Route> to={Route::Home} />
            }
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <nav class="nav">
                <Link<Route> to={Route::Home}>{ "動画一覧" }</Link<Route>>
                <Link<Route> to={Route::Watcher}>{ "中継フォルダ" }</Link<Route>>
            </nav>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}
