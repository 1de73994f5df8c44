//! Interface capability probes.
//!
//! A probe walks the descriptor subtree below a device looking for an
//! interface with a given class/subclass/protocol triple. Only existence
//! matters, so the walk stops at the first hit.

use crate::discover::{Property, RegistryNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceSignature {
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
}

impl InterfaceSignature {
    pub const fn new(class: u8, subclass: u8, protocol: u8) -> Self {
        Self {
            class,
            subclass,
            protocol,
        }
    }

    /// Missing or non-integer properties never match.
    pub fn matches<N: RegistryNode>(&self, node: &N) -> bool {
        let field = |key| node.int_property(key);
        field(Property::InterfaceClass) == Some(self.class.into())
            && field(Property::InterfaceSubClass) == Some(self.subclass.into())
            && field(Property::InterfaceProtocol) == Some(self.protocol.into())
    }
}

/// Android Debug Bridge interface.
pub const ADB_SIGNATURE: InterfaceSignature = InterfaceSignature::new(0xFF, 0x42, 0x01);

/// Still-image interface every real iOS device exposes.
pub const IOS_CONFIRMATION_SIGNATURE: InterfaceSignature =
    InterfaceSignature::new(0x06, 0x01, 0x01);

pub fn probe_adb_capability<N: RegistryNode>(device: &N) -> bool {
    subtree_has_signature(device, ADB_SIGNATURE)
}

pub fn probe_ios_confirmation<N: RegistryNode>(device: &N) -> bool {
    subtree_has_signature(device, IOS_CONFIRMATION_SIGNATURE)
}

/// Depth-first search over the descendants of `root` (not `root` itself).
///
/// Nodes are owned by the work list, so whatever is still pending when a match
/// is found gets released when the list drops.
pub fn subtree_has_signature<N: RegistryNode>(root: &N, signature: InterfaceSignature) -> bool {
    let mut stack = match root.children() {
        Ok(children) => children,
        Err(err) => {
            log::debug!("subtree unavailable, treating {signature:?} as absent: {err:#}");
            return false;
        }
    };

    while let Some(node) = stack.pop() {
        if signature.matches(&node) {
            return true;
        }
        match node.children() {
            Ok(children) => stack.extend(children),
            Err(err) => log::debug!("skipping unreadable branch: {err:#}"),
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::PropertyValue;
    use anyhow::anyhow;

    #[derive(Clone)]
    enum Node {
        Iface(u8, u8, u8, Vec<Node>),
        Opaque(Vec<Node>),
        Broken,
    }

    impl RegistryNode for Node {
        fn property(&self, key: Property) -> Option<PropertyValue> {
            let Node::Iface(c, s, p, _) = self else {
                return None;
            };
            let v = match key {
                Property::InterfaceClass => *c,
                Property::InterfaceSubClass => *s,
                Property::InterfaceProtocol => *p,
                _ => return None,
            };
            Some(PropertyValue::Int(v.into()))
        }

        fn children(&self) -> anyhow::Result<Vec<Self>> {
            match self {
                Node::Iface(_, _, _, c) | Node::Opaque(c) => Ok(c.clone()),
                Node::Broken => Err(anyhow!("iterator creation failed")),
            }
        }
    }

    #[test]
    fn finds_adb_interface_among_siblings() {
        let dev = Node::Opaque(vec![
            Node::Iface(0x06, 0x01, 0x01, vec![]),
            Node::Iface(0xFF, 0x42, 0x01, vec![]),
        ]);
        assert!(probe_adb_capability(&dev));
        assert!(probe_ios_confirmation(&dev));
    }

    #[test]
    fn finds_deeply_nested_interface() {
        let mut node = Node::Iface(0xFF, 0x42, 0x01, vec![]);
        for _ in 0..64 {
            node = Node::Opaque(vec![node]);
        }
        let dev = Node::Opaque(vec![node]);
        assert!(probe_adb_capability(&dev));
    }

    #[test]
    fn partial_match_is_not_a_match() {
        let dev = Node::Opaque(vec![
            Node::Iface(0xFF, 0x42, 0x03, vec![]),
            Node::Iface(0xFF, 0x43, 0x01, vec![]),
        ]);
        assert!(!probe_adb_capability(&dev));
    }

    #[test]
    fn root_itself_is_not_tested() {
        let dev = Node::Iface(0xFF, 0x42, 0x01, vec![]);
        assert!(!probe_adb_capability(&dev));
    }

    #[test]
    fn failed_enumeration_means_absent() {
        assert!(!probe_adb_capability(&Node::Broken));
    }

    #[test]
    fn broken_branch_does_not_hide_other_branches() {
        let dev = Node::Opaque(vec![
            Node::Iface(0xFF, 0x42, 0x01, vec![]),
            Node::Broken,
        ]);
        assert!(probe_adb_capability(&dev));
    }
}
