#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

//! Argument validation and exact wire shapes for the fire-and-forget calls.

use serde_json::Value;
use tokio::sync::mpsc;

use framehub_client::{HostLink, WidgetClient, WidgetClientConfig, WidgetEvents};
use framehub_core::error::ErrorCode;
use framehub_core::protocol::commands::ModalOptions;

struct Wire {
    client: WidgetClient,
    outbound: mpsc::Receiver<String>,
    // Held so the reader task stays attached for the test's duration.
    _events: WidgetEvents,
    _from_host: mpsc::Sender<String>,
}

fn wire() -> Wire {
    let (to_host_tx, to_host_rx) = mpsc::channel(16);
    let (from_host_tx, from_host_rx) = mpsc::channel(16);
    let (client, events) = WidgetClient::attach(
        "w-9",
        HostLink {
            to_host: to_host_tx,
            from_host: from_host_rx,
        },
        WidgetClientConfig::default(),
    );
    Wire {
        client,
        outbound: to_host_rx,
        _events: events,
        _from_host: from_host_tx,
    }
}

fn sent_json(wire: &mut Wire) -> Value {
    let text = wire.outbound.try_recv().expect("an envelope should have been sent");
    serde_json::from_str(&text).unwrap()
}

fn nothing_sent(wire: &mut Wire) {
    assert!(
        wire.outbound.try_recv().is_err(),
        "rejected call must not put an envelope on the wire"
    );
}

#[tokio::test]
async fn empty_required_arguments_are_rejected_before_anything_is_sent() {
    let mut w = wire();

    let cases: Vec<framehub_core::error::FrameHubError> = vec![
        w.client.open_modal("", ModalOptions::default()).await.unwrap_err(),
        w.client
            .open_incident_modal("  ", ModalOptions::default())
            .await
            .unwrap_err(),
        w.client.open_app_mode("", "https://x.example").await.unwrap_err(),
        w.client.share_deep_link("").await.unwrap_err(),
        w.client.toast("", None, None, None).await.unwrap_err(),
        w.client.spawn_widget_by_name("").await.unwrap_err(),
        w.client.spawn_widget_by_guid("\t").await.unwrap_err(),
        w.client.rename(" ").await.unwrap_err(),
        w.client.reload_widget("", None).await.unwrap_err(),
        w.client.reload_instance("", None).await.unwrap_err(),
        w.client.switch_desktop("").await.unwrap_err(),
    ];
    for err in cases {
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
    nothing_sent(&mut w);
}

#[tokio::test]
async fn zero_dimensions_are_rejected() {
    let mut w = wire();

    assert_eq!(
        w.client.resize(0, 200).await.unwrap_err().code(),
        ErrorCode::BadRequest
    );
    assert_eq!(
        w.client.resize(300, 0).await.unwrap_err().code(),
        ErrorCode::BadRequest
    );
    nothing_sent(&mut w);
}

#[tokio::test]
async fn resize_sends_the_widget_guid_and_dimensions() {
    let mut w = wire();
    w.client.resize(300, 200).await.unwrap();

    let v = sent_json(&mut w);
    assert_eq!(v["event"], "widget.resize");
    assert_eq!(v["guid"], "w-9");
    assert_eq!(v["width"], 300);
    assert_eq!(v["height"], 200);
    assert!(v.get("txn").is_none(), "fire-and-forget must not carry a txn");
}

#[tokio::test]
async fn toast_omits_options_the_caller_did_not_set() {
    let mut w = wire();
    w.client.toast("saved", None, Some("success"), None).await.unwrap();

    let v = sent_json(&mut w);
    assert_eq!(v["event"], "toast");
    assert_eq!(v["message"], "saved");
    assert_eq!(v["color"], "success");
    assert!(v.get("icon").is_none());
    assert!(v.get("timer").is_none());
}

#[tokio::test]
async fn modal_options_go_out_pascal_case() {
    let mut w = wire();
    let options = ModalOptions {
        title: Some("New incident".into()),
        width: Some(640),
        height: None,
        rest: Default::default(),
    };
    w.client
        .open_incident_modal("https://portal.acme.com/incident/new", options)
        .await
        .unwrap();

    let v = sent_json(&mut w);
    assert_eq!(v["event"], "modal.createincident");
    assert_eq!(v["url"], "https://portal.acme.com/incident/new");
    assert_eq!(v["options"]["Title"], "New incident");
    assert_eq!(v["options"]["Width"], 640);
    assert!(v["options"].get("Height").is_none());
}

#[tokio::test]
async fn spawn_and_switch_use_their_historical_field_names() {
    let mut w = wire();

    w.client.spawn_widget_by_name("ticker").await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "spawnwidget.name");
    assert_eq!(v["val"], "ticker");

    w.client.switch_desktop("d-42").await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "switch-desktop");
    assert_eq!(v["desktopid"], "d-42");
}

#[tokio::test]
async fn reload_calls_address_by_the_event_appropriate_key() {
    let mut w = wire();

    w.client.reload_widget("g-1", Some(serde_json::json!({"rows": 5}))).await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "configwidget");
    assert_eq!(v["guid"], "g-1");
    assert_eq!(v["cfg"]["rows"], 5);
    assert!(v.get("instanceGuid").is_none());

    w.client.reload_instance("i-2", None).await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "widgetrefresh");
    assert_eq!(v["instanceGuid"], "i-2");
    assert!(v.get("guid").is_none());
    assert!(v.get("cfg").is_none());

    w.client.reload_app_mode().await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "appmoderefresh");
    assert_eq!(v["guid"], "w-9");
}

#[tokio::test]
async fn expiration_reset_keeps_the_val_field_on_the_wire() {
    let mut w = wire();

    w.client.reset_expiration().await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "expiration.reset");
    assert_eq!(v["val"], true);

    w.client.set_expiration_enabled(false).await.unwrap();
    let v = sent_json(&mut w);
    assert_eq!(v["event"], "expiration.enabled");
    assert_eq!(v["val"], false);
}

#[tokio::test]
async fn deep_link_share_carries_this_widgets_guid() {
    let mut w = wire();
    w.client.share_deep_link(r#"{"symbol":"ACME"}"#).await.unwrap();

    let v = sent_json(&mut w);
    assert_eq!(v["event"], "modal.deeplink");
    assert_eq!(v["guid"], "w-9");
    assert_eq!(v["json"], r#"{"symbol":"ACME"}"#);
}

#[tokio::test]
async fn parameterless_commands_send_bare_envelopes() {
    let mut w = wire();

    w.client.clear_alerts().await.unwrap();
    assert_eq!(sent_json(&mut w)["event"], "alerts.clear");

    w.client.refresh_desktop_menu().await.unwrap();
    assert_eq!(sent_json(&mut w)["event"], "refresh.desktopmenu");

    w.client.refresh_news().await.unwrap();
    assert_eq!(sent_json(&mut w)["event"], "refresh.news");
}
