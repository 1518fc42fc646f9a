use detective_core::{
    GraphEdge, GraphNode, NodeId, Properties, PropertyValue, Record, RecordError,
};

fn properties(record: &Record, column: &str) -> Result<Properties, RecordError> {
    match record.require(column)? {
        PropertyValue::Map(map) => Ok(map.clone()),
        PropertyValue::Null => Ok(Properties::new()),
        other => Err(RecordError::UnexpectedType {
            column: column.to_string(),
            expected: "map",
            found: other.type_name(),
        }),
    }
}

fn labels(record: &Record, column: &str) -> Result<Vec<String>, RecordError> {
    let value = record.require(column)?;
    let unexpected = |found: &'static str| RecordError::UnexpectedType {
        column: column.to_string(),
        expected: "list of strings",
        found,
    };
    let items = value.as_list().ok_or_else(|| unexpected(value.type_name()))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| unexpected(item.type_name()))
        })
        .collect()
}

/// `labels`, `props`, `id` columns of the node query.
pub(crate) fn node_from_record(record: &Record) -> Result<GraphNode, RecordError> {
    Ok(GraphNode::new(
        NodeId::new(record.require_str("id")?),
        labels(record, "labels")?,
        properties(record, "props")?,
    ))
}

/// `source`, `relationship`, `target`, `props` columns of the relationship query.
pub(crate) fn edge_from_record(record: &Record) -> Result<GraphEdge, RecordError> {
    Ok(GraphEdge {
        source: NodeId::new(record.require_str("source")?),
        target: NodeId::new(record.require_str("target")?),
        rel_type: record.require_str("relationship")?.to_string(),
        properties: properties(record, "props")?,
    })
}
