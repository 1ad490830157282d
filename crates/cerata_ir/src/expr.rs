//! Integer expressions over nodes: evaluation, simplification and rendering.

use crate::error::GraphError;
use crate::ids::NodeId;
use crate::node::{BinOp, LiteralValue, NodeKind};
use crate::pool::Pool;

impl Pool {
    /// Value of an integer literal node.
    pub fn int_value(&self, node: NodeId) -> Option<i64> {
        match self.node(node).literal() {
            Some(LiteralValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Evaluates a node to an integer through parameters and expressions.
    /// `None` when some leaf is symbolic or the arithmetic fails.
    pub fn resolve_int(&self, node: NodeId) -> Option<i64> {
        match self.node(node).kind {
            NodeKind::Literal(LiteralValue::Int(v)) => Some(v),
            NodeKind::Parameter { .. } => self.resolve_int(self.parameter_value(node)?),
            NodeKind::Expression { op, lhs, rhs } => {
                op.apply(self.resolve_int(lhs)?, self.resolve_int(rhs)?)
            }
            _ => None,
        }
    }

    /// Text of a literal: integers in decimal, booleans as `true`/`false`,
    /// strings verbatim.
    pub fn literal_string(&self, node: NodeId) -> Option<String> {
        self.node(node).literal().map(LiteralValue::to_string)
    }

    /// Text of a node as it appears in generated code: the literal value,
    /// the expression with minimal parentheses, or the node name.
    pub fn node_string(&self, node: NodeId) -> String {
        match self.node(node).kind {
            NodeKind::Literal(ref value) => value.to_string(),
            NodeKind::Expression { op, lhs, rhs } => {
                let l = self.operand_string(lhs, op, false);
                let r = self.operand_string(rhs, op, true);
                format!("{l}{op}{r}")
            }
            _ => self.node_name(node).to_string(),
        }
    }

    fn operand_string(&self, node: NodeId, parent: BinOp, right: bool) -> String {
        let text = self.node_string(node);
        let parens = match self.node(node).kind {
            NodeKind::Literal(LiteralValue::Int(v)) => v < 0,
            NodeKind::Expression { op: child, .. } => match parent {
                BinOp::Add => false,
                BinOp::Sub => right && child.is_additive(),
                BinOp::Mul => child.is_additive() || (right && child == BinOp::Div),
                BinOp::Div => child.is_additive() || right,
            },
            _ => false,
        };
        if parens {
            format!("({text})")
        } else {
            text
        }
    }

    /// Minimizes `node` and renders the result.
    pub fn minimized_string(&mut self, node: NodeId) -> Result<String, GraphError> {
        let min = self.minimize(node)?;
        Ok(self.node_string(min))
    }

    /// Simplifies an expression tree.
    ///
    /// Children are minimized first and new nodes are created for changed
    /// subtrees; existing nodes are never mutated. Then `x+0`, `0+x`, `x-0`,
    /// `x*1`, `1*x` and `x/1` become `x`, `x*0`, `0*x` and `0/x` become `0`,
    /// and operations on two integer literals are folded. Non-expressions are
    /// returned unchanged.
    pub fn minimize(&mut self, node: NodeId) -> Result<NodeId, GraphError> {
        let NodeKind::Expression { op, lhs, rhs } = self.node(node).kind else {
            return Ok(node);
        };
        let l = self.minimize(lhs)?;
        let r = self.minimize(rhs)?;
        let (lv, rv) = (self.int_value(l), self.int_value(r));

        match op {
            BinOp::Add if lv == Some(0) => return Ok(r),
            BinOp::Add | BinOp::Sub if rv == Some(0) => return Ok(l),
            BinOp::Mul if lv == Some(0) || rv == Some(0) => return Ok(self.intl(0)),
            BinOp::Mul if lv == Some(1) => return Ok(r),
            BinOp::Mul if rv == Some(1) => return Ok(l),
            BinOp::Div if rv == Some(0) => {
                return Err(GraphError::DivisionByZero {
                    expr: self.node_string(node),
                })
            }
            BinOp::Div if lv == Some(0) => return Ok(self.intl(0)),
            BinOp::Div if rv == Some(1) => return Ok(l),
            _ => {}
        }

        if let (Some(a), Some(b)) = (lv, rv) {
            let folded = op.apply(a, b).ok_or_else(|| GraphError::Overflow {
                expr: self.node_string(node),
            })?;
            return Ok(self.intl(folded));
        }
        if l == lhs && r == rhs {
            return Ok(node);
        }
        Ok(self.expression(op, l, r))
    }
}
