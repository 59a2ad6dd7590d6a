//! Drag-and-drop board rendering shared by the lead and pipeline pages.
//!
//! # Design
//! - Pages map their board into plain column/card models; this component never sees domain types.
//! - The dragged card id travels in the `DataTransfer` payload.
//! - A drop on a card anchors before it; a drop on empty column space appends.

use yew::prelude::*;

const DRAG_MIME: &str = "text/plain";

/// One card as rendered.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CardModel {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
}

/// One column as rendered; `key` is the stage wire value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColumnModel {
    pub key: &'static str,
    pub title: &'static str,
    pub cards: Vec<CardModel>,
}

/// Drop reported back to the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DropRequest {
    pub card_id: i64,
    pub target: String,
    pub anchor: Option<i64>,
}

#[derive(Properties, PartialEq)]
pub(crate) struct KanbanProps {
    pub columns: Vec<ColumnModel>,
    pub on_drop: Callback<DropRequest>,
    #[prop_or_default]
    pub on_open: Option<Callback<i64>>,
}

#[function_component(Kanban)]
pub(crate) fn kanban(props: &KanbanProps) -> Html {
    html! {
        <div class="kanban">
            {for props.columns.iter().map(|column| render_column(column, props))}
        </div>
    }
}

fn render_column(column: &ColumnModel, props: &KanbanProps) -> Html {
    let on_drop = {
        let on_drop = props.on_drop.clone();
        let target = column.key.to_string();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            if let Some(card_id) = dragged_card(&event) {
                on_drop.emit(DropRequest {
                    card_id,
                    target: target.clone(),
                    anchor: None,
                });
            }
        })
    };

    html! {
        <section class="kanban-column" data-stage={column.key} ondragover={Callback::from(|event: DragEvent| event.prevent_default())} ondrop={on_drop}>
            <header class="kanban-column-head">
                <strong>{column.title}</strong>
                <span class="pill subtle">{column.cards.len()}</span>
            </header>
            <div class="kanban-cards">
                {for column.cards.iter().map(|card| render_card(card, column.key, props))}
            </div>
        </section>
    }
}

fn render_card(card: &CardModel, column_key: &'static str, props: &KanbanProps) -> Html {
    let id = card.id;
    let on_drag_start = Callback::from(move |event: DragEvent| {
        if let Some(transfer) = event.data_transfer() {
            if transfer.set_data(DRAG_MIME, &id.to_string()).is_err() {
                tracing::warn!(card = id, "failed to start drag");
            }
        }
    });
    let on_drop = {
        let on_drop = props.on_drop.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(card_id) = dragged_card(&event) {
                on_drop.emit(DropRequest {
                    card_id,
                    target: column_key.to_string(),
                    anchor: Some(id),
                });
            }
        })
    };
    let on_click = props
        .on_open
        .clone()
        .map(|on_open| Callback::from(move |_: MouseEvent| on_open.emit(id)));

    html! {
        <article class="kanban-card" draggable="true" ondragstart={on_drag_start} ondrop={on_drop} onclick={on_click}>
            <strong>{card.title.clone()}</strong>
            {card.subtitle.clone().map(|text| html! { <p class="muted">{text}</p> }).unwrap_or_default()}
            {card.footer.clone().map(|text| html! { <small>{text}</small> }).unwrap_or_default()}
        </article>
    }
}

fn dragged_card(event: &DragEvent) -> Option<i64> {
    event
        .data_transfer()
        .and_then(|transfer| transfer.get_data(DRAG_MIME).ok())
        .and_then(|value| value.parse::<i64>().ok())
}
