//! Статический spatial index для k-NN поиска по географическим точкам.
//!
//! Снимок строится один раз из полного списка записей методом
//! Sort-Tile-Recursive (STR) и после этого не изменяется: каждая
//! пересборка даёт целиком новый снимок. Поиск — best-first обход
//! bounding box'ов с planar метрикой в градусах. Метрика служит
//! только для упорядочивания кандидатов, точное расстояние
//! пересчитывает вызывающая сторона.

use std::{cmp::Ordering, collections::BinaryHeap};

use crate::geo::{GeoPoint, Location};

/// Максимальное количество записей в листовом узле.
const MAX_ENTRIES: usize = 8;

/// Запись индекса: локация плюс порядковый номер построения.
/// Номер разрешает ничьи при равных дистанциях детерминированно.
#[derive(Debug, Clone)]
struct IndexEntry {
    location: Location,
    seq: usize,
}

/// Узел дерева (внутренний или листовой).
#[derive(Debug)]
enum IndexNode {
    Leaf {
        entries: Vec<IndexEntry>,
        bbox: BoundingBox,
    },
    Internal {
        children: Vec<Box<IndexNode>>,
        bbox: BoundingBox,
    },
}

/// Прямоугольная область (bounding box) на плоскости (lon, lat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Неизменяемый снимок spatial индекса, построенный из одного
/// согласованного списка записей.
#[derive(Debug)]
pub struct GeoSnapshot {
    root: Option<Box<IndexNode>>,
    size: usize,
}

/// Статистика дерева снимка.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotStats {
    pub depth: usize,
    pub node_count: usize,
    pub leaf_count: usize,
}

/// Элемент priority queue для k-NN search.
#[derive(Debug)]
struct PqItem<'a> {
    dist: f64,
    seq: usize,
    kind: PqKind<'a>,
}

#[derive(Debug)]
enum PqKind<'a> {
    Node(&'a IndexNode),
    Entry(&'a IndexEntry),
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl BoundingBox {
    /// Создаёт bounding box из одной точки.
    fn from_point(point: GeoPoint) -> Self {
        Self {
            min_lon: point.lon,
            max_lon: point.lon,
            min_lat: point.lat,
            max_lat: point.lat,
        }
    }

    /// Расширяет bbox, чтобы включить другой bbox.
    fn expand(
        &mut self,
        other: &BoundingBox,
    ) {
        self.min_lon = self.min_lon.min(other.min_lon);
        self.max_lon = self.max_lon.max(other.max_lon);
        self.min_lat = self.min_lat.min(other.min_lat);
        self.max_lat = self.max_lat.max(other.max_lat);
    }

    /// Минимальное planar расстояние от точки до bbox (в градусах).
    /// 0, если точка внутри.
    fn min_distance_to_point(
        &self,
        point: GeoPoint,
    ) -> f64 {
        let dx = if point.lon < self.min_lon {
            self.min_lon - point.lon
        } else if point.lon > self.max_lon {
            point.lon - self.max_lon
        } else {
            0.0
        };

        let dy = if point.lat < self.min_lat {
            self.min_lat - point.lat
        } else if point.lat > self.max_lat {
            point.lat - self.max_lat
        } else {
            0.0
        };

        (dx * dx + dy * dy).sqrt()
    }
}

impl IndexNode {
    /// Возвращает bounding box узла.
    fn bbox(&self) -> &BoundingBox {
        match self {
            IndexNode::Leaf { bbox, .. } => bbox,
            IndexNode::Internal { bbox, .. } => bbox,
        }
    }
}

impl GeoSnapshot {
    /// Строит снимок из списка записей (STR bulk loading).
    ///
    /// Пустой список — валидный вход: снимок готов, но пуст.
    /// Дубликаты координат и одинаковые имена с разными id
    /// допустимы, порядок записей фиксируется как tie-breaker.
    pub fn build(records: Vec<Location>) -> Self {
        let size = records.len();
        let entries: Vec<IndexEntry> = records
            .into_iter()
            .enumerate()
            .map(|(seq, location)| IndexEntry { location, seq })
            .collect();

        if entries.is_empty() {
            return Self { root: None, size };
        }

        let root = Self::build_str(entries, 0);

        Self {
            root: Some(root),
            size,
        }
    }

    /// Рекурсивное построение дерева методом STR: на каждом уровне
    /// сортируем по одной из осей (чередуя lon и lat), режем на
    /// примерно sqrt(n) страйпов и спускаемся в каждый.
    fn build_str(
        mut entries: Vec<IndexEntry>,
        level: usize,
    ) -> Box<IndexNode> {
        // sort_by стабилен, поэтому при равных координатах
        // сохраняется порядок построения
        if level % 2 == 0 {
            entries.sort_by(|a, b| {
                a.location
                    .point
                    .lon
                    .partial_cmp(&b.location.point.lon)
                    .unwrap_or(Ordering::Equal)
            });
        } else {
            entries.sort_by(|a, b| {
                a.location
                    .point
                    .lat
                    .partial_cmp(&b.location.point.lat)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if entries.len() <= MAX_ENTRIES {
            let bbox = Self::bbox_of_entries(&entries);
            return Box::new(IndexNode::Leaf { entries, bbox });
        }

        let slice_count = ((entries.len() as f64).sqrt().ceil() as usize).max(2);
        let slice_size = entries.len().div_ceil(slice_count);

        let mut slices: Vec<Vec<IndexEntry>> = Vec::new();
        let mut current_slice = Vec::with_capacity(slice_size);

        for entry in entries {
            current_slice.push(entry);
            if current_slice.len() >= slice_size {
                slices.push(std::mem::take(&mut current_slice));
            }
        }
        if !current_slice.is_empty() {
            slices.push(current_slice);
        }

        let children: Vec<Box<IndexNode>> = slices
            .into_iter()
            .map(|slice| Self::build_str(slice, level + 1))
            .collect();

        let bbox = Self::bbox_of_children(&children);
        Box::new(IndexNode::Internal { children, bbox })
    }

    fn bbox_of_entries(entries: &[IndexEntry]) -> BoundingBox {
        let mut bbox = BoundingBox::from_point(entries[0].location.point);
        for entry in entries.iter().skip(1) {
            bbox.expand(&BoundingBox::from_point(entry.location.point));
        }
        bbox
    }

    fn bbox_of_children(children: &[Box<IndexNode>]) -> BoundingBox {
        let mut bbox = *children[0].bbox();
        for child in children.iter().skip(1) {
            bbox.expand(child.bbox());
        }
        bbox
    }

    /// k-NN search: до `k` записей в порядке возрастания planar
    /// дистанции до цели, ничьи — в порядке построения снимка.
    ///
    /// Best-first обход: в очереди лежат узлы (с нижней оценкой
    /// дистанции по bbox) и записи (с точной planar дистанцией).
    /// Когда из очереди выходит запись, ближе неё уже ничего нет.
    pub fn query_nearest(
        &self,
        target: GeoPoint,
        k: usize,
    ) -> Vec<&Location> {
        let root = match &self.root {
            Some(root) => root,
            None => return Vec::new(),
        };
        if k == 0 {
            return Vec::new();
        }

        let mut pq: BinaryHeap<PqItem> = BinaryHeap::new();
        pq.push(PqItem {
            dist: 0.0,
            seq: 0,
            kind: PqKind::Node(root.as_ref()),
        });

        let mut results: Vec<&Location> = Vec::with_capacity(k.min(self.size));

        while let Some(item) = pq.pop() {
            match item.kind {
                PqKind::Entry(entry) => {
                    results.push(&entry.location);
                    if results.len() >= k {
                        break;
                    }
                }
                PqKind::Node(IndexNode::Leaf { entries, .. }) => {
                    for entry in entries {
                        pq.push(PqItem {
                            dist: planar_distance(target, entry.location.point),
                            seq: entry.seq,
                            kind: PqKind::Entry(entry),
                        });
                    }
                }
                PqKind::Node(IndexNode::Internal { children, .. }) => {
                    for child in children {
                        pq.push(PqItem {
                            dist: child.bbox().min_distance_to_point(target),
                            seq: 0,
                            kind: PqKind::Node(child.as_ref()),
                        });
                    }
                }
            }
        }

        results
    }

    /// Возвращает количество записей в снимке.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Проверяет, пуст ли снимок.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Статистика дерева (глубина, количество узлов).
    pub fn stats(&self) -> SnapshotStats {
        if let Some(ref root) = self.root {
            Self::compute_stats(root.as_ref(), 0)
        } else {
            SnapshotStats {
                depth: 0,
                node_count: 0,
                leaf_count: 0,
            }
        }
    }

    fn compute_stats(
        node: &IndexNode,
        level: usize,
    ) -> SnapshotStats {
        match node {
            IndexNode::Leaf { .. } => SnapshotStats {
                depth: level + 1,
                node_count: 1,
                leaf_count: 1,
            },
            IndexNode::Internal { children, .. } => {
                let mut stats = SnapshotStats {
                    depth: level + 1,
                    node_count: 1,
                    leaf_count: 0,
                };
                for child in children {
                    let child_stats = Self::compute_stats(child, level + 1);
                    stats.depth = stats.depth.max(child_stats.depth);
                    stats.node_count += child_stats.node_count;
                    stats.leaf_count += child_stats.leaf_count;
                }
                stats
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Внутренние методы и функции
////////////////////////////////////////////////////////////////////////////////

/// Planar расстояние в градусах. Метрика упорядочивания внутри
/// индекса, не для показа пользователю.
fn planar_distance(
    p1: GeoPoint,
    p2: GeoPoint,
) -> f64 {
    let dx = p2.lon - p1.lon;
    let dy = p2.lat - p1.lat;
    (dx * dx + dy * dy).sqrt()
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для PqItem
////////////////////////////////////////////////////////////////////////////////

impl PqItem<'_> {
    fn is_entry(&self) -> bool {
        matches!(self.kind, PqKind::Entry(_))
    }
}

impl PartialEq for PqItem<'_> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.dist == other.dist && self.is_entry() == other.is_entry() && self.seq == other.seq
    }
}

impl Eq for PqItem<'_> {}

impl PartialOrd for PqItem<'_> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PqItem<'_> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        // Min-heap: меньшая дистанция = выше приоритет. При равных
        // дистанциях сначала узлы (они могут скрывать записи с меньшим
        // seq), затем записи по порядку построения.
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.is_entry().cmp(&self.is_entry()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
