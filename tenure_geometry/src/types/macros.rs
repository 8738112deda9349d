/// `From<Vec<T>>` and `From<&[T; N]>` for list geometries whose items
/// convert from `T`.
macro_rules! impl_list_from {
	($($list:ty => $item:ty),* $(,)?) => {$(
		impl<T> From<Vec<T>> for $list
		where
			$item: From<T>,
		{
			fn from(items: Vec<T>) -> Self {
				Self(items.into_iter().map(<$item>::from).collect())
			}
		}

		impl<'a, T, const N: usize> From<&'a [T; N]> for $list
		where
			$item: From<&'a T>,
		{
			fn from(items: &'a [T; N]) -> Self {
				Self(items.iter().map(<$item>::from).collect())
			}
		}
	)*};
}

pub(crate) use impl_list_from;
