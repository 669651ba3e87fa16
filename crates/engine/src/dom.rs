//! Applying resolved styles directly to an element.
//!
//! The element is abstracted as a [`StyleTarget`]. Event wiring and frame
//! scheduling belong to the host: it forwards events to
//! [`DomApplier::handle`] and calls [`DomApplier::on_animation_frame`] once
//! per frame.

use crate::rule::ProcessedStyle;
use gale_core::{Breakpoint, Config, Declaration};
use indexmap::IndexMap;

/// Properties whose first application is held back by one frame.
const TRANSITION_PROPERTIES: [(&str, &str); 2] = [("transition", "none"), ("transition-duration", "0s")];

/// Style sink and source of one element.
pub trait StyleTarget {
    /// Current value of `property`, empty when unset.
    fn get_property(&self, property: &str) -> String;

    /// Sets `property`; an empty value clears it.
    fn set_property(&mut self, property: &str, value: &str);

    /// Flushes pending style changes.
    fn force_reflow(&mut self) {}
}

/// Event pair emulating a pseudo-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Hover,
    Focus,
    Active,
}

impl Trigger {
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "hover" => Some(Trigger::Hover),
            "focus" => Some(Trigger::Focus),
            "active" => Some(Trigger::Active),
            _ => None,
        }
    }

    pub fn enter_event(self) -> &'static str {
        match self {
            Trigger::Hover => "mouseover",
            Trigger::Focus => "focus",
            Trigger::Active => "mousedown",
        }
    }

    pub fn leave_event(self) -> &'static str {
        match self {
            Trigger::Hover => "mouseout",
            Trigger::Focus => "blur",
            Trigger::Active => "mouseup",
        }
    }
}

/// `Idle -> Applied -> Idle` per element, with the prior values captured
/// before any event fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudoState {
    prior: IndexMap<String, String>,
    applied: bool,
}

impl PseudoState {
    /// Records the current value of every property about to be overridden.
    pub fn capture<T: StyleTarget + ?Sized>(&mut self, target: &T, declarations: &[Declaration]) {
        self.prior = declarations
            .iter()
            .map(|decl| (decl.property.clone(), target.get_property(&decl.property)))
            .collect();
    }

    pub fn enter<T: StyleTarget + ?Sized>(&mut self, target: &mut T, declarations: &[Declaration]) {
        if self.applied {
            return;
        }
        for decl in declarations {
            target.set_property(&decl.property, &decl.value);
        }
        self.applied = true;
    }

    /// Restores the captured values verbatim.
    pub fn leave<T: StyleTarget + ?Sized>(&mut self, target: &mut T) {
        if !self.applied {
            return;
        }
        for (property, value) in &self.prior {
            target.set_property(property, value);
        }
        self.applied = false;
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn prior(&self) -> &IndexMap<String, String> {
        &self.prior
    }
}

/// How one resolved class is applied to an element.
#[derive(Debug, Clone, PartialEq)]
pub enum DomBinding {
    /// applied once
    Static(Vec<Declaration>),
    /// applied while the trigger is active
    Pseudo {
        trigger: Trigger,
        declarations: Vec<Declaration>,
        state: PseudoState,
    },
    /// applied while the viewport width falls in the breakpoint
    Responsive {
        breakpoint: Breakpoint,
        declarations: Vec<Declaration>,
    },
}

impl DomBinding {
    /// Builds a binding for a resolved class. Prefixes that cannot be
    /// emulated on an element yield `None`.
    pub fn from_style(style: &ProcessedStyle, config: &Config) -> Option<Self> {
        let declarations = style.declarations();
        let Some(prefix) = style.prefix.as_deref() else {
            return Some(DomBinding::Static(declarations));
        };

        if let Some(trigger) = Trigger::from_prefix(prefix) {
            return Some(DomBinding::Pseudo {
                trigger,
                declarations,
                state: PseudoState::default(),
            });
        }

        if let Some(breakpoint) = config.breakpoint(prefix) {
            return Some(DomBinding::Responsive {
                breakpoint: breakpoint.clone(),
                declarations,
            });
        }

        log::debug!("prefix `{}` of `{}` has no DOM emulation", prefix, style.class_name);
        None
    }
}

/// Event forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomEvent<'a> {
    /// a named DOM event, e.g. `mouseover`
    Event(&'a str),
    Resize { width: f64 },
}

/// 元素样式应用器
///
/// 持有元素及其绑定，所有回调都重新读取当前状态，不跨回调持有引用。
#[derive(Debug)]
pub struct DomApplier<T: StyleTarget> {
    target: T,
    bindings: Vec<DomBinding>,
    /// transition values restored on the next frame
    deferred: Vec<Declaration>,
}

impl<T: StyleTarget> DomApplier<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            bindings: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn bind(&mut self, binding: DomBinding) {
        self.bindings.push(binding);
    }

    pub fn bindings(&self) -> &[DomBinding] {
        &self.bindings
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Event names the host has to forward.
    pub fn events(&self) -> Vec<&'static str> {
        let mut events: Vec<&'static str> = Vec::new();
        for binding in &self.bindings {
            let names = match binding {
                DomBinding::Pseudo { trigger, .. } => vec![trigger.enter_event(), trigger.leave_event()],
                DomBinding::Responsive { .. } => vec!["resize"],
                DomBinding::Static(_) => Vec::new(),
            };
            for name in names {
                if !events.contains(&name) {
                    events.push(name);
                }
            }
        }
        events
    }

    /// 挂载到元素
    ///
    /// 1. 应用静态绑定，并按初始宽度计算响应式绑定
    /// 2. 之后再为伪类绑定记录原值，与类名书写顺序无关
    pub fn attach(&mut self, width: f64) {
        let mut bindings = std::mem::take(&mut self.bindings);
        for binding in &bindings {
            match binding {
                DomBinding::Static(declarations) => self.apply_initial(declarations),
                DomBinding::Responsive {
                    breakpoint,
                    declarations,
                } => evaluate(&mut self.target, breakpoint, declarations, width),
                DomBinding::Pseudo { .. } => {}
            }
        }
        for binding in &mut bindings {
            if let DomBinding::Pseudo {
                declarations,
                state,
                ..
            } = binding
            {
                state.capture(&self.target, declarations);
            }
        }
        self.bindings = bindings;
    }

    pub fn handle(&mut self, event: DomEvent<'_>) {
        for binding in &mut self.bindings {
            match (binding, event) {
                (
                    DomBinding::Pseudo {
                        trigger,
                        declarations,
                        state,
                    },
                    DomEvent::Event(name),
                ) => {
                    if name == trigger.enter_event() {
                        state.enter(&mut self.target, declarations);
                    } else if name == trigger.leave_event() {
                        state.leave(&mut self.target);
                    }
                }
                (
                    DomBinding::Responsive {
                        breakpoint,
                        declarations,
                    },
                    DomEvent::Resize { width },
                ) => evaluate(&mut self.target, breakpoint, declarations, width),
                _ => {}
            }
        }
    }

    /// Restores transition values held back during [`attach`](Self::attach).
    pub fn on_animation_frame(&mut self) {
        for decl in self.deferred.drain(..) {
            self.target.set_property(&decl.property, &decl.value);
        }
    }

    fn apply_initial(&mut self, declarations: &[Declaration]) {
        let mut suppressed = false;
        for decl in declarations {
            let placeholder = TRANSITION_PROPERTIES
                .iter()
                .find(|(property, _)| *property == decl.property)
                .map(|(_, placeholder)| *placeholder);
            match placeholder {
                Some(placeholder) => {
                    self.target.set_property(&decl.property, placeholder);
                    self.deferred.push(decl.clone());
                    suppressed = true;
                }
                None => self.target.set_property(&decl.property, &decl.value),
            }
        }
        if suppressed {
            self.target.force_reflow();
        }
    }
}

/// Runs on every resize: set when inside the range, clear otherwise.
fn evaluate<T: StyleTarget + ?Sized>(
    target: &mut T,
    breakpoint: &Breakpoint,
    declarations: &[Declaration],
    width: f64,
) {
    let matched = breakpoint.matches(width);
    for decl in declarations {
        let value = if matched { decl.value.as_str() } else { "" };
        target.set_property(&decl.property, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Element {
        styles: IndexMap<String, String>,
        reflows: usize,
        writes: Vec<(String, String)>,
    }

    impl StyleTarget for Element {
        fn get_property(&self, property: &str) -> String {
            self.styles.get(property).cloned().unwrap_or_default()
        }

        fn set_property(&mut self, property: &str, value: &str) {
            self.writes.push((property.to_string(), value.to_string()));
            if value.is_empty() {
                self.styles.shift_remove(property);
            } else {
                self.styles.insert(property.to_string(), value.to_string());
            }
        }

        fn force_reflow(&mut self) {
            self.reflows += 1;
        }
    }

    fn decls(pairs: &[(&str, &str)]) -> Vec<Declaration> {
        pairs.iter().map(|(p, v)| Declaration::new(*p, *v)).collect()
    }

    #[test]
    fn test_pseudo_state_restores_prior_values() {
        let mut element = Element::default();
        element.styles.insert("color".into(), "black".into());

        let mut applier = DomApplier::new(element);
        applier.bind(DomBinding::Pseudo {
            trigger: Trigger::Hover,
            declarations: decls(&[("color", "red"), ("background", "blue")]),
            state: PseudoState::default(),
        });
        applier.attach(1024.0);
        assert_eq!(applier.events(), vec!["mouseover", "mouseout"]);

        applier.handle(DomEvent::Event("mouseover"));
        assert_eq!(applier.target().get_property("color"), "red");
        assert_eq!(applier.target().get_property("background"), "blue");

        // repeated enter is a no-op
        applier.handle(DomEvent::Event("mouseover"));

        applier.handle(DomEvent::Event("mouseout"));
        assert_eq!(applier.target().get_property("color"), "black");
        assert_eq!(applier.target().get_property("background"), "");
    }

    #[test]
    fn test_pseudo_listed_before_static_restores_static_value() {
        let mut applier = DomApplier::new(Element::default());
        applier.bind(DomBinding::Pseudo {
            trigger: Trigger::Hover,
            declarations: decls(&[("background", "blue")]),
            state: PseudoState::default(),
        });
        applier.bind(DomBinding::Static(decls(&[("background", "red")])));

        applier.attach(1024.0);
        assert_eq!(applier.target().get_property("background"), "red");

        applier.handle(DomEvent::Event("mouseover"));
        assert_eq!(applier.target().get_property("background"), "blue");
        applier.handle(DomEvent::Event("mouseout"));
        assert_eq!(applier.target().get_property("background"), "red");
    }

    #[test]
    fn test_prior_captured_before_events() {
        let mut element = Element::default();
        element.styles.insert("color".into(), "green".into());
        let mut state = PseudoState::default();
        let declarations = decls(&[("color", "red")]);

        state.capture(&element, &declarations);
        assert!(!state.is_applied());
        state.enter(&mut element, &declarations);
        assert!(state.is_applied());
        element.styles.insert("color".into(), "purple".into());
        state.leave(&mut element);
        assert_eq!(element.get_property("color"), "green");
        assert_eq!(state.prior().get("color").map(String::as_str), Some("green"));
    }

    #[test]
    fn test_responsive_reevaluates_on_every_resize() {
        let mut applier = DomApplier::new(Element::default());
        applier.bind(DomBinding::Responsive {
            breakpoint: Breakpoint::min("md", 768.0),
            declarations: decls(&[("display", "flex")]),
        });

        applier.attach(500.0);
        assert_eq!(applier.target().get_property("display"), "");

        applier.handle(DomEvent::Resize { width: 800.0 });
        assert_eq!(applier.target().get_property("display"), "flex");

        applier.handle(DomEvent::Resize { width: 700.0 });
        assert_eq!(applier.target().get_property("display"), "");

        applier.handle(DomEvent::Resize { width: 900.0 });
        assert_eq!(applier.target().get_property("display"), "flex");
    }

    #[test]
    fn test_transition_suppressed_for_one_frame() {
        let mut applier = DomApplier::new(Element::default());
        applier.bind(DomBinding::Static(decls(&[
            ("transition", "all 200ms"),
            ("opacity", "1"),
        ])));

        applier.attach(1024.0);
        assert_eq!(applier.target().get_property("transition"), "none");
        assert_eq!(applier.target().get_property("opacity"), "1");
        assert_eq!(applier.target().reflows, 1);

        applier.on_animation_frame();
        assert_eq!(applier.target().get_property("transition"), "all 200ms");

        // nothing left to restore
        let element = {
            applier.on_animation_frame();
            applier.into_target()
        };
        assert_eq!(
            element.writes.iter().filter(|(p, _)| p == "transition").count(),
            2
        );
    }

    #[test]
    fn test_binding_from_style() {
        use crate::rule::CssRules;

        let config = Config::new().with_breakpoint(Breakpoint::min("md", 768.0));
        let style = |prefix: Option<&str>| ProcessedStyle {
            class_name: "x".into(),
            css_rules: CssRules::Property("color".into()),
            value: Some("red".into()),
            prefix: prefix.map(str::to_string),
            from_alias: false,
        };

        assert_eq!(
            DomBinding::from_style(&style(None), &config),
            Some(DomBinding::Static(decls(&[("color", "red")])))
        );
        assert!(matches!(
            DomBinding::from_style(&style(Some("focus")), &config),
            Some(DomBinding::Pseudo {
                trigger: Trigger::Focus,
                ..
            })
        ));
        assert!(matches!(
            DomBinding::from_style(&style(Some("md")), &config),
            Some(DomBinding::Responsive { .. })
        ));
        assert_eq!(DomBinding::from_style(&style(Some("dark")), &config), None);
    }
}
