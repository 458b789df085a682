use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use log::debug;
use stylist::yew::styled_component;
use web_sys::Document;
use yew::prelude::*;

use crate::config::NotificationConfig;
use crate::error::{EffectError, Result};

const ROOT_ID: &str = "notification-root";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    fn accent(self) -> &'static str {
        match self {
            Severity::Info => "#667eea",
            Severity::Error => "#e74c3c",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u32,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(id: u32, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Where a notification is in its lifetime, measured from creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationPhase {
    Entering,
    Shown,
    Leaving,
    Removed,
}

impl NotificationPhase {
    pub fn at(elapsed_ms: u32, timing: &NotificationConfig) -> Self {
        let [shown_at, leaving_at, removed_at] = schedule(timing);
        if elapsed_ms < shown_at {
            NotificationPhase::Entering
        } else if elapsed_ms < leaving_at {
            NotificationPhase::Shown
        } else if elapsed_ms < removed_at {
            NotificationPhase::Leaving
        } else {
            NotificationPhase::Removed
        }
    }

    fn is_visible(self) -> bool {
        self == NotificationPhase::Shown
    }
}

/// Longest delay `setTimeout` honours; anything above fires immediately.
const MAX_TIMER_DELAY_MS: u32 = i32::MAX as u32;

/// Delays after creation at which the phase changes. Values come from page
/// config, so they are clamped to timer range and never run out of order.
pub fn schedule(timing: &NotificationConfig) -> [u32; 3] {
    let shown_at = timing.enter_delay_ms.min(MAX_TIMER_DELAY_MS);
    let leaving_at = timing.dismiss_after_ms.min(MAX_TIMER_DELAY_MS).max(shown_at);
    let removed_at = leaving_at
        .saturating_add(timing.exit_duration_ms)
        .min(MAX_TIMER_DELAY_MS);
    [shown_at, leaving_at, removed_at]
}

pub enum ToastAction {
    Push(Notification),
    Advance { id: u32, phase: NotificationPhase },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastStack {
    pub items: Vec<(Notification, NotificationPhase)>,
}

impl Reducible for ToastStack {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();
        match action {
            ToastAction::Push(notification) => {
                items.push((notification, NotificationPhase::Entering));
            }
            ToastAction::Advance {
                id,
                phase: NotificationPhase::Removed,
            } => {
                items.retain(|(notification, _)| notification.id != id);
            }
            ToastAction::Advance { id, phase } => {
                if let Some(item) = items.iter_mut().find(|(notification, _)| notification.id == id) {
                    item.1 = phase;
                }
            }
        }
        Rc::new(ToastStack { items })
    }
}

thread_local! {
    static DISPATCH: RefCell<Option<Callback<Notification>>> = RefCell::new(None);
    static PENDING: RefCell<Vec<Notification>> = RefCell::new(Vec::new());
    static NEXT_ID: Cell<u32> = Cell::new(0);
}

/// Raises a transient banner. Calls made before the host mounts are
/// replayed once it does.
pub fn show(message: impl Into<String>, severity: Severity) {
    let id = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    });
    let notification = Notification::new(id, message, severity);
    debug!("notification {}: {}", id, notification.message);

    let dispatch = DISPATCH.with(|d| d.borrow().clone());
    match dispatch {
        Some(callback) => callback.emit(notification),
        None => PENDING.with(|pending| pending.borrow_mut().push(notification)),
    }
}

#[derive(Properties, PartialEq)]
pub struct NotificationHostProps {
    pub timing: NotificationConfig,
}

#[styled_component(NotificationHost)]
pub fn notification_host(props: &NotificationHostProps) -> Html {
    let stack = use_reducer(ToastStack::default);

    {
        let dispatcher = stack.dispatcher();
        let timing = props.timing;
        use_effect_with_deps(
            move |_| {
                let on_show = Callback::from(move |notification: Notification| {
                    let id = notification.id;
                    dispatcher.dispatch(ToastAction::Push(notification));
                    for delay in schedule(&timing) {
                        let phase = NotificationPhase::at(delay, &timing);
                        let dispatcher = dispatcher.clone();
                        Timeout::new(delay, move || {
                            dispatcher.dispatch(ToastAction::Advance { id, phase });
                        })
                        .forget();
                    }
                });

                let queued = PENDING.with(|pending| pending.borrow_mut().drain(..).collect::<Vec<_>>());
                for notification in queued {
                    on_show.emit(notification);
                }
                DISPATCH.with(|d| *d.borrow_mut() = Some(on_show));

                || DISPATCH.with(|d| *d.borrow_mut() = None)
            },
            (),
        );
    }

    let container = css!(
        r#"
        position: fixed;
        top: 20px;
        right: 20px;
        display: flex;
        flex-direction: column;
        gap: 10px;
        z-index: 10000;
        pointer-events: none;
        "#
    );
    let toast = css!(
        r#"
        padding: 12px 20px;
        border-radius: 8px;
        color: #fff;
        font-size: 14px;
        box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2);
        transition: transform 0.4s ease, opacity 0.4s ease;
        "#
    );

    html! {
        <div class={container}>
            { for stack.items.iter().map(|(notification, phase)| {
                let (offset, opacity) = if phase.is_visible() { ("0", "1") } else { ("120%", "0") };
                html! {
                    <div
                        key={notification.id}
                        class={classes!(toast.clone(), "notification")}
                        style={format!(
                            "background: {}; transform: translateX({}); opacity: {};",
                            notification.severity.accent(), offset, opacity
                        )}
                    >
                        { &notification.message }
                    </div>
                }
            })}
        </div>
    }
}

pub fn mount(document: &Document, timing: NotificationConfig) -> Result<()> {
    let body = document.body().ok_or_else(|| EffectError::MissingElement("body".to_string()))?;
    let root = document.create_element("div")?;
    root.set_id(ROOT_ID);
    body.append_child(&root)?;

    yew::Renderer::<NotificationHost>::with_root_and_props(root, NotificationHostProps { timing }).render();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> NotificationConfig {
        NotificationConfig::default()
    }

    fn sample(id: u32) -> Notification {
        Notification::new(id, "Contact info copied!", Severity::Info)
    }

    #[test]
    fn timeline_matches_defaults() {
        let timing = timing();
        assert_eq!(NotificationPhase::at(0, &timing), NotificationPhase::Entering);
        assert_eq!(NotificationPhase::at(99, &timing), NotificationPhase::Entering);
        assert_eq!(NotificationPhase::at(100, &timing), NotificationPhase::Shown);
        assert_eq!(NotificationPhase::at(2999, &timing), NotificationPhase::Shown);
        assert_eq!(NotificationPhase::at(3000, &timing), NotificationPhase::Leaving);
        assert_eq!(NotificationPhase::at(3399, &timing), NotificationPhase::Leaving);
        assert_eq!(NotificationPhase::at(3400, &timing), NotificationPhase::Removed);
    }

    #[test]
    fn schedule_agrees_with_timeline() {
        let timing = timing();
        assert_eq!(schedule(&timing), [100, 3000, 3400]);
        let phases: Vec<_> = schedule(&timing)
            .iter()
            .map(|delay| NotificationPhase::at(*delay, &timing))
            .collect();
        assert_eq!(
            phases,
            vec![NotificationPhase::Shown, NotificationPhase::Leaving, NotificationPhase::Removed]
        );
    }

    #[test]
    fn oversized_timing_never_removes_before_slide_out() {
        let timing: NotificationConfig =
            serde_json::from_str(r#"{ "dismiss_after_ms": 4294967295 }"#).unwrap();
        let [shown, leaving, removed] = schedule(&timing);
        assert_eq!(shown, 100);
        assert_eq!(leaving, i32::MAX as u32);
        assert!(removed >= leaving);
        assert!(removed <= i32::MAX as u32);
        assert_eq!(NotificationPhase::at(leaving - 1, &timing), NotificationPhase::Shown);
    }

    #[test]
    fn out_of_order_timing_keeps_phase_order() {
        let timing: NotificationConfig = serde_json::from_str(
            r#"{ "enter_delay_ms": 5000, "dismiss_after_ms": 1000, "exit_duration_ms": 4294967295 }"#,
        )
        .unwrap();
        let [shown, leaving, removed] = schedule(&timing);
        assert!(shown <= leaving && leaving <= removed);
        assert_eq!(NotificationPhase::at(0, &timing), NotificationPhase::Entering);
        assert_eq!(NotificationPhase::at(removed, &timing), NotificationPhase::Removed);
    }

    #[test]
    fn stack_runs_one_notification_through_its_life() {
        let stack = Rc::new(ToastStack::default());
        let stack = stack.reduce(ToastAction::Push(sample(1)));
        assert_eq!(stack.items.len(), 1);
        assert_eq!(stack.items[0].1, NotificationPhase::Entering);

        let stack = stack.reduce(ToastAction::Advance { id: 1, phase: NotificationPhase::Shown });
        assert_eq!(stack.items[0].1, NotificationPhase::Shown);

        let stack = stack.reduce(ToastAction::Advance { id: 1, phase: NotificationPhase::Leaving });
        assert_eq!(stack.items[0].1, NotificationPhase::Leaving);

        let stack = stack.reduce(ToastAction::Advance { id: 1, phase: NotificationPhase::Removed });
        assert!(stack.items.is_empty());
    }

    #[test]
    fn concurrent_notifications_stack_independently() {
        let stack = Rc::new(ToastStack::default())
            .reduce(ToastAction::Push(sample(1)))
            .reduce(ToastAction::Push(sample(2)))
            .reduce(ToastAction::Advance { id: 1, phase: NotificationPhase::Removed });

        assert_eq!(stack.items.len(), 1);
        assert_eq!(stack.items[0].0.id, 2);
        assert_eq!(stack.items[0].1, NotificationPhase::Entering);
    }

    #[test]
    fn late_advance_for_removed_id_is_ignored() {
        let stack = Rc::new(ToastStack::default())
            .reduce(ToastAction::Advance { id: 9, phase: NotificationPhase::Shown });
        assert!(stack.items.is_empty());
    }
}
