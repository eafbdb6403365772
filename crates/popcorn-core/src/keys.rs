/// Keys the app reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub detail_open: bool,
    pub input_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    CloseDetail,
    FocusSearch,
}

pub fn dispatch(key: Key, ctx: KeyContext) -> Option<KeyAction> {
    match key {
        Key::Escape if ctx.detail_open => Some(KeyAction::CloseDetail),
        Key::Enter if !ctx.input_focused => Some(KeyAction::FocusSearch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_closes_open_detail_only() {
        let open = KeyContext { detail_open: true, input_focused: true };
        assert_eq!(dispatch(Key::Escape, open), Some(KeyAction::CloseDetail));
        assert_eq!(dispatch(Key::Escape, KeyContext::default()), None);
    }

    #[test]
    fn test_enter_focuses_search_unless_typing() {
        assert_eq!(dispatch(Key::Enter, KeyContext::default()), Some(KeyAction::FocusSearch));
        let typing = KeyContext { detail_open: false, input_focused: true };
        assert_eq!(dispatch(Key::Enter, typing), None);
    }

    #[test]
    fn test_other_keys_do_nothing() {
        let ctx = KeyContext { detail_open: true, input_focused: false };
        assert_eq!(dispatch(Key::Char('x'), ctx), None);
        assert_eq!(dispatch(Key::Other, ctx), None);
    }
}
