use std::rc::Rc;

use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::watch::{IntervalTicker, STOPPED_MESSAGE, StatusToggler};

#[function_component(Watcher)]
pub fn watcher() -> Html {
    let status = use_state(|| STOPPED_MESSAGE);

    let toggler = {
        let setter = status.setter();
        use_mut_ref(move || {
            StatusToggler::new(
                IntervalTicker,
                Rc::new(move |text: &'static str| setter.set(text)),
            )
        })
    };

    let onchange = {
        let toggler = toggler.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            toggler.borrow_mut().on_change(input.checked());
        })
    };

    html! {
        <div class="page watcher-page">
            <header class="header">
                <h1>{ "中継フォルダ" }</h1>
            </header>
            <label class="watcher">
                <input id="watcher" type="checkbox" {onchange} />
                <span id="status">{ *status }</span>
            </label>
        </div>
    }
}
